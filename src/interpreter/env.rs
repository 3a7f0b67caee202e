use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::value::Value;

pub type EnvRef = Rc<RefCell<Env>>;

/// One lexical frame: bindings plus a link to the enclosing frame. Frames
/// are shared by aliasing — closures keep their declaration frame alive.
pub struct Env {
    vars: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Env {
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Env {
            vars: HashMap::new(),
            parent: None,
        }))
    }

    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Env {
            vars: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Binds in this frame unconditionally, shadowing outer bindings.
    pub fn define(env: &EnvRef, name: &str, value: Value) {
        env.borrow_mut().vars.insert(name.to_string(), value);
    }

    /// Resolves against the innermost frame that defines `name`.
    pub fn lookup(env: &EnvRef, name: &str) -> Option<Value> {
        let mut current = Rc::clone(env);
        loop {
            if let Some(value) = current.borrow().vars.get(name) {
                return Some(value.clone());
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Rebinds in the nearest frame defining `name`; false when absent.
    pub fn assign_existing(env: &EnvRef, name: &str, value: Value) -> bool {
        let mut current = Rc::clone(env);
        loop {
            if current.borrow().vars.contains_key(name) {
                current.borrow_mut().vars.insert(name.to_string(), value);
                return true;
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}
