pub mod native;

use crate::{string::IdentName, value::Value};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// A frame of name bindings with an optional enclosing frame.
///
/// Cloning shares the frame. Functions keep a clone of the frame they were defined in, which
/// keeps it alive for as long as the function is reachable.
#[derive(Clone, Default)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentImpl>>,
}

#[derive(Default)]
struct EnvironmentImpl {
    values: HashMap<IdentName, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Looks a name up in this frame, then in each enclosing frame outward.
    pub fn access(&self, name: &str) -> Option<Value> {
        let inner = self.inner.borrow();
        inner.access(name)
    }

    /// Binds a name in this frame, shadowing any binding in enclosing frames.
    pub fn declare(&self, name: IdentName, value: Value) {
        let mut inner = self.inner.borrow_mut();
        inner.declare(name, value)
    }

    pub fn is_global(&self) -> bool {
        self.inner.borrow().parent.is_none()
    }
}

impl EnvironmentImpl {
    fn access(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(ref parent) = self.parent {
            parent.access(name)
        } else {
            None
        }
    }

    fn declare(&mut self, name: IdentName, value: Value) {
        self.values.insert(name, value);
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may hold closures over this frame, so only the names are shown.
        let inner = self.inner.borrow();
        let mut names: Vec<_> = inner.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("parent", &inner.parent)
            .finish()
    }
}
