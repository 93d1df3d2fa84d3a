use super::value::Value;
use compact_str::CompactString;
use std::collections::HashMap;

/// Name to value bindings of a single activation.
pub type Frame = HashMap<CompactString, Value>;

/// Flat variable environment with call scoped save and restore.
///
/// Exactly one frame is visible at a time. Entering a call pushes a copy of
/// the current frame for the callee to mutate; leaving the call pops it, so
/// the caller never observes anything the callee bound or rebound.
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    fn current(&self) -> &Frame {
        self.frames
            .last()
            .expect("The global frame is never popped.")
    }

    fn current_mut(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("The global frame is never popped.")
    }

    pub fn access(&self, name: &str) -> Option<&Value> {
        self.current().get(name)
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        self.current_mut().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.current().contains_key(name)
    }

    pub fn push_call_frame(&mut self) {
        let frame = self.current().clone();
        self.frames.push(frame);
    }

    pub fn pop_call_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of active call frames above the global one.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.current().iter().collect();
        names.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        write!(f, "{{")?;
        for (index, (name, value)) in names.into_iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match value {
                Value::String(v) => write!(f, "{name}: {v:?}")?,
                v => write!(f, "{name}: {v}")?,
            }
        }
        write!(f, "}}")
    }
}
