use super::SystemContext;
use std::io::Write;
use std::time::Duration;

/// Talks to the real process: stdout, the thread clock and process exit.
pub struct StdioContext;

impl SystemContext for StdioContext {
    fn write(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // Nothing sensible to do if stdout went away.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn exit(&mut self, code: i32) {
        let _ = std::io::stdout().flush();
        std::process::exit(code);
    }
}

/// Records every effect instead of performing it.
#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
    sleeps: Vec<Duration>,
    exit_code: Option<i32>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.buffer
    }

    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn into_data(self) -> String {
        self.buffer
    }
}

impl SystemContext for BufferedContext {
    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
