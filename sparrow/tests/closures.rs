// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use sparrow::{Environment, FuncObject, Lexer, Node, Parser, Value};

fn parse(source: &str) -> Vec<Node> {
    let mut lexer = Lexer::with_text(source);
    match Parser::new().parse(&mut lexer).unwrap() {
        Node::Program(statements) => statements,
        other => panic!("expected a program, got {other:?}"),
    }
}

#[test]
fn function_definition_captures_its_frame() {
    let statements = parse("def teller(stap) { totaal = totaal + stap; return totaal }");
    let Node::FunctionDef(definition) = &statements[0] else {
        panic!("expected a function definition, got {:?}", statements[0]);
    };

    let global = Environment::new();
    global.put("totaal", Value::Integer(10));

    let function = Rc::new(FuncObject::from_definition(definition, &global));
    global.put(&definition.name, Value::Function(Rc::clone(&function)));

    assert_eq!(function.parameters(), ["stap".to_string()]);
    assert_eq!(function.body().statements().map(<[Node]>::len), Some(2));

    // What an evaluator would do for `teller(5)` called from a nested block.
    let caller = global.new_child_frame().new_child_frame();
    caller.put_new("totaal", Value::Integer(-1));

    let frame = function.runtime_env();
    frame.put_new("stap", Value::Integer(5));
    let total = match (frame.lookup("totaal"), frame.lookup("stap")) {
        (Some(Value::Integer(total)), Some(Value::Integer(step))) => total + step,
        other => panic!("unexpected bindings {other:?}"),
    };
    frame.put("totaal", Value::Integer(total));

    assert_eq!(global.get("totaal"), Some(Value::Integer(15)));
    assert_eq!(caller.get("totaal"), Some(Value::Integer(-1)));
    assert_eq!(frame.get("totaal"), None);
    assert_eq!(global.lookup("teller").and_then(|value| value.as_function().cloned()).map(|f| Rc::ptr_eq(&f, &function)), Some(true));
}

#[test]
fn lambda_keeps_returned_scope_alive() {
    let statements = parse("maker = lamb(start) { return lamb() { start = start + 1 } }");
    let Node::Binary(assignment) = &statements[0] else {
        panic!("expected an assignment, got {:?}", statements[0]);
    };
    let Node::Lambda(outer) = assignment.rhs.as_ref() else {
        panic!("expected a lambda, got {:?}", assignment.rhs);
    };
    let Some([Node::Return(inner)]) = outer.body.statements() else {
        panic!("expected a single return, got {:?}", outer.body);
    };
    let Node::Lambda(inner) = inner.as_ref() else {
        panic!("expected a lambda, got {inner:?}");
    };

    let global = Environment::new();
    let maker = FuncObject::from_lambda(outer, &global);

    let counter = {
        let call = maker.runtime_env();
        call.put_new("start", Value::Integer(0));
        FuncObject::from_lambda(inner, &call)
    };

    for expected in 1..=3 {
        let call = counter.runtime_env();
        let Some(Value::Integer(start)) = call.lookup("start") else {
            panic!("`start` should still be reachable");
        };
        call.put("start", Value::Integer(start + 1));
        assert_eq!(counter.env().get("start"), Some(Value::Integer(expected)));
    }

    assert_eq!(global.get("start"), None);
}

#[test]
fn call_frame_sees_later_rebinding_in_defining_frame() {
    let statements = parse("def lees() { return x }");
    let Node::FunctionDef(definition) = &statements[0] else {
        panic!("expected a function definition, got {:?}", statements[0]);
    };

    let defining = Environment::new();
    defining.put("x", Value::Integer(1));
    let function = FuncObject::from_definition(definition, &defining);

    defining.put("x", Value::Integer(5));

    assert_eq!(function.runtime_env().lookup("x"), Some(Value::Integer(5)));
}
