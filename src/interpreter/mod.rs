pub mod context;
pub mod environment;
pub mod error;
pub mod formatter;
pub mod native;
mod tree;
pub mod value;

use std::time::Duration;

pub use tree::{InterpreterPhase, TreeWalkInterpreter, MAX_CALL_DEPTH, MAX_EVALUATION_DEPTH};

/// Every observable effect of a running program goes through this trait.
pub trait SystemContext {
    fn write(&mut self, text: &str);
    fn writeln(&mut self, text: &str);
    /// Blocks the whole program for the given duration.
    fn sleep(&mut self, duration: Duration);
    /// Ends the program. Implementations may terminate the process outright;
    /// if they return, the interpreter stops executing on its own.
    fn exit(&mut self, code: i32);
}
