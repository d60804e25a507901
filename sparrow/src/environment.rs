// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{cell::RefCell, collections::HashMap, fmt::Debug, rc::Rc};

use crate::{FunctionDef, Lambda, Node, Value};

/// One lexical scope: the bindings it introduces and the scope around it.
///
/// Frames are shared through [`Rc`], both by nested frames and by the
/// closures that captured them, and live as long as their longest holder.
#[derive(Debug, Default)]
pub struct Environment {
    outer: Option<Rc<Environment>>,
    bindings: RefCell<HashMap<String, Value>>,
}

impl Environment {
    /// A root frame without an outer frame.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Self::with_outer(None)
    }

    #[must_use]
    pub fn with_outer(outer: Option<Rc<Self>>) -> Rc<Self> {
        Rc::new(Self {
            outer,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Creates a frame nested in this one, e.g. when entering a block.
    #[must_use]
    pub fn new_child_frame(self: &Rc<Self>) -> Rc<Self> {
        Self::with_outer(Some(Rc::clone(self)))
    }

    #[must_use]
    pub fn outer(&self) -> Option<&Rc<Self>> {
        self.outer.as_ref()
    }

    /// The value bound to `name` in this frame, ignoring outer frames.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    /// The value bound to `name` in the nearest frame that binds it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.bindings.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.lookup(name)),
        }
    }

    /// Assigns to the nearest frame that already binds `name`. A name that
    /// is bound nowhere is created in this frame, not in the root.
    pub fn put(&self, name: &str, value: Value) {
        match self.locate(name) {
            Some(frame) => {
                frame.bindings.borrow_mut().insert(name.to_string(), value);
            }

            None => self.put_new(name, value),
        }
    }

    /// Binds `name` in this frame, shadowing any outer binding.
    pub fn put_new(&self, name: &str, value: Value) {
        log::debug!("Binding `{name}`");
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    fn locate(&self, name: &str) -> Option<&Self> {
        if self.bindings.borrow().contains_key(name) {
            return Some(self);
        }

        self.outer.as_deref().and_then(|outer| outer.locate(name))
    }
}

/// A function value: parameters and body together with the frame it was
/// defined in.
pub struct FuncObject {
    parameters: Vec<String>,
    body: Rc<Node>,
    env: Rc<Environment>,
}

impl FuncObject {
    #[must_use]
    pub fn new(parameters: Vec<String>, body: Rc<Node>, env: Rc<Environment>) -> Self {
        Self { parameters, body, env }
    }

    #[must_use]
    pub fn from_definition(definition: &FunctionDef, env: &Rc<Environment>) -> Self {
        Self::new(definition.parameters.clone(), Rc::new((*definition.body).clone()), Rc::clone(env))
    }

    #[must_use]
    pub fn from_lambda(lambda: &Lambda, env: &Rc<Environment>) -> Self {
        Self::new(lambda.parameters.clone(), Rc::new((*lambda.body).clone()), Rc::clone(env))
    }

    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    #[must_use]
    pub fn body(&self) -> &Rc<Node> {
        &self.body
    }

    #[must_use]
    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    /// A fresh frame for one call, nested in the defining frame rather than
    /// the caller's.
    #[must_use]
    pub fn runtime_env(&self) -> Rc<Environment> {
        self.env.new_child_frame()
    }
}

impl Debug for FuncObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuncObject")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_only_sees_own_frame() {
        let root = Environment::new();
        root.put("x", Value::Integer(1));

        let child = root.new_child_frame();
        assert_eq!(child.get("x"), None);
        assert_eq!(child.lookup("x"), Some(Value::Integer(1)));
        assert_eq!(root.get("y"), None);
        assert_eq!(child.lookup("y"), None);
    }

    #[test]
    fn put_updates_nearest_binding() {
        let root = Environment::new();
        root.put("x", Value::Integer(1));

        let middle = root.new_child_frame();
        middle.put_new("x", Value::Integer(2));

        let inner = middle.new_child_frame();
        inner.put("x", Value::Integer(3));

        assert_eq!(root.get("x"), Some(Value::Integer(1)));
        assert_eq!(middle.get("x"), Some(Value::Integer(3)));
        assert_eq!(inner.get("x"), None);
    }

    #[test]
    fn put_creates_in_innermost_frame() {
        let root = Environment::new();
        let inner = root.new_child_frame().new_child_frame();

        inner.put("fresh", Value::from("nieuw"));

        assert_eq!(inner.get("fresh"), Some(Value::from("nieuw")));
        assert_eq!(root.get("fresh"), None);
        assert_eq!(inner.outer().and_then(|outer| outer.get("fresh")), None);
    }

    #[test]
    fn put_new_shadows() {
        let root = Environment::new();
        root.put("x", Value::Integer(1));

        let child = root.new_child_frame();
        child.put_new("x", Value::Integer(2));
        child.put("x", Value::Integer(3));

        assert_eq!(root.get("x"), Some(Value::Integer(1)));
        assert_eq!(child.get("x"), Some(Value::Integer(3)));
    }

    #[test]
    fn runtime_env_nests_in_defining_frame() {
        let defining = Environment::new();
        defining.put("counter", Value::Integer(0));

        let function = FuncObject::new(Vec::new(), Rc::new(Node::Block(Vec::new())), Rc::clone(&defining));

        let caller = Environment::new();
        caller.put("counter", Value::Integer(100));

        let frame = function.runtime_env();
        assert!(frame.outer().is_some_and(|outer| Rc::ptr_eq(outer, &defining)));
        assert_eq!(frame.lookup("counter"), Some(Value::Integer(0)));

        frame.put("counter", Value::Integer(1));
        assert_eq!(defining.get("counter"), Some(Value::Integer(1)));
        assert_eq!(caller.get("counter"), Some(Value::Integer(100)));
    }

    #[test]
    fn every_call_gets_a_fresh_frame() {
        let function = FuncObject::new(vec!["a".into()], Rc::new(Node::Block(Vec::new())), Environment::new());

        let first = function.runtime_env();
        first.put_new("a", Value::Integer(1));

        let second = function.runtime_env();
        assert_eq!(second.get("a"), None);
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn captured_frame_outlives_its_scope() {
        let function = {
            let scope = Environment::new().new_child_frame();
            scope.put("kept", Value::Integer(7));
            FuncObject::new(Vec::new(), Rc::new(Node::Block(Vec::new())), scope)
        };

        assert_eq!(function.runtime_env().lookup("kept"), Some(Value::Integer(7)));
    }
}
