//! Lexical scopes.
//!
//! A scope is an ordered map of bindings plus an optional enclosing scope.
//! Lookups walk outward; declarations only ever touch the innermost map.

use crate::value::JikiObject;
use indexmap::IndexMap;
use jiki_types::Snapshot;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: JikiObject,
    pub constant: bool,
}

/// Why an assignment to an existing name failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    NotDeclared,
    Constant,
}

#[derive(Debug, Default)]
pub struct Scope {
    bindings: RefCell<IndexMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    /// A fresh global scope.
    pub fn global() -> Rc<Scope> {
        Rc::new(Scope::default())
    }

    /// A new scope enclosed by `parent`.
    pub fn child(parent: &Rc<Scope>) -> Rc<Scope> {
        Rc::new(Scope {
            bindings: RefCell::new(IndexMap::new()),
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    /// Bind `name` here, replacing any existing binding in this scope.
    ///
    /// Callers run the declaration guards first.
    pub fn define(&self, name: &str, value: JikiObject, constant: bool) {
        self.bindings
            .borrow_mut()
            .insert(name.to_string(), Binding { value, constant });
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Whether any enclosing scope (not this one) binds `name`.
    pub fn has_enclosing(&self, name: &str) -> bool {
        let mut current = self.parent.as_deref();
        while let Some(scope) = current {
            if scope.has_local(name) {
                return true;
            }
            current = scope.parent.as_deref();
        }
        false
    }

    pub fn get(&self, name: &str) -> Option<JikiObject> {
        self.lookup(name).map(|b| b.value)
    }

    pub fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some(binding) = self.bindings.borrow().get(name) {
            return Some(binding.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Update the nearest binding of `name`.
    pub fn assign(&self, name: &str, value: JikiObject) -> Result<(), AssignError> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(binding) = bindings.get_mut(name) {
                if binding.constant {
                    return Err(AssignError::Constant);
                }
                binding.value = value;
                return Ok(());
            }
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(AssignError::NotDeclared),
        }
    }

    /// Snapshot every visible non-callable binding, inner names hiding outer.
    pub fn snapshot(&self) -> BTreeMap<String, Snapshot> {
        let mut out = BTreeMap::new();
        let mut hidden = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            for (name, binding) in scope.bindings.borrow().iter() {
                if out.contains_key(name) || hidden.contains(name) {
                    continue;
                }
                if binding.value.is_callable() {
                    hidden.push(name.clone());
                    continue;
                }
                out.insert(name.clone(), binding.value.unwrap());
            }
            current = scope.parent.as_deref();
        }
        out
    }

    /// Drop every binding, releasing closures that point back at this scope.
    pub fn clear(&self) {
        self.bindings.borrow_mut().clear();
    }
}
