pub mod context;
mod tree;

pub use tree::{evaluate, TreeWalkEvaluator, TreeWalkInterpreter};

/// Where program output goes.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}
