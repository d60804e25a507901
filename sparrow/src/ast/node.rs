// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter, Write};

use super::{
    BinaryExpression, CallExpression, ClassDef, FunctionDef, IfStatement, IndexExpression,
    Lambda, Literal, MemberExpression, NewExpression, UnaryExpression, UnaryOperator,
    UseStatement, WhileStatement,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program(Vec<Node>),
    ClassDef(ClassDef),
    FunctionDef(FunctionDef),
    Block(Vec<Node>),
    If(IfStatement),
    While(WhileStatement),
    Return(Box<Node>),
    Use(UseStatement),

    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Literal(Literal),
    Identifier(String),
    Call(CallExpression),
    Member(MemberExpression),
    Index(IndexExpression),
    New(NewExpression),
    Array(Vec<Node>),
    Lambda(Lambda),
}

impl Node {
    /// The statements of a `Program` or `Block`.
    #[must_use]
    pub fn statements(&self) -> Option<&[Node]> {
        match self {
            Self::Program(statements) | Self::Block(statements) => Some(statements),
            _ => None,
        }
    }
}

/// Renders the tree as nested, parenthesized prefix forms, e.g. `(+ 1 (* 2 3))`.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Program(statements) => write_list(f, "program", statements),
            Self::Block(statements) => write_list(f, "block", statements),

            Self::ClassDef(class) => {
                f.write_fmt(format_args!("(class {}", class.name))?;
                if let Some(superclass) = &class.superclass {
                    f.write_fmt(format_args!(" extends {superclass}"))?;
                }
                for member in &class.body {
                    f.write_fmt(format_args!(" {member}"))?;
                }
                f.write_char(')')
            }

            Self::FunctionDef(def) => {
                f.write_fmt(format_args!("(def {} ", def.name))?;
                write_parameters(f, &def.parameters)?;
                f.write_fmt(format_args!(" {})", def.body))
            }

            Self::If(statement) => {
                f.write_fmt(format_args!("(if {} {}", statement.condition, statement.body))?;
                for elif in &statement.elifs {
                    f.write_fmt(format_args!(" (elif {} {})", elif.condition, elif.body))?;
                }
                if let Some(else_body) = &statement.else_body {
                    f.write_fmt(format_args!(" (else {else_body})"))?;
                }
                f.write_char(')')
            }

            Self::While(statement) => f.write_fmt(format_args!("(while {} {})", statement.condition, statement.body)),
            Self::Return(value) => f.write_fmt(format_args!("(return {value})")),
            Self::Use(statement) => f.write_fmt(format_args!("(use {} {})", statement.alias, statement.module)),

            Self::Binary(expr) => f.write_fmt(format_args!("({} {} {})", expr.operator, expr.lhs, expr.rhs)),
            Self::Unary(expr) => match expr.operator {
                UnaryOperator::Negate => f.write_fmt(format_args!("(- {})", expr.operand)),
            },
            Self::Literal(literal) => literal.fmt(f),
            Self::Identifier(name) => f.write_str(name),

            Self::Call(call) => {
                f.write_fmt(format_args!("(call {}", call.callee))?;
                for argument in &call.arguments {
                    f.write_fmt(format_args!(" {argument}"))?;
                }
                f.write_char(')')
            }

            Self::Member(expr) => f.write_fmt(format_args!("(. {} {})", expr.object, expr.member)),
            Self::Index(expr) => f.write_fmt(format_args!("([] {} {})", expr.object, expr.index)),

            Self::New(expr) => {
                f.write_fmt(format_args!("(new {}", expr.class))?;
                for argument in &expr.arguments {
                    f.write_fmt(format_args!(" {argument}"))?;
                }
                f.write_char(')')
            }

            Self::Array(elements) => {
                f.write_char('[')?;
                for (idx, element) in elements.iter().enumerate() {
                    if idx != 0 {
                        f.write_char(' ')?;
                    }
                    element.fmt(f)?;
                }
                f.write_char(']')
            }

            Self::Lambda(lambda) => {
                f.write_str("(lamb ")?;
                write_parameters(f, &lambda.parameters)?;
                f.write_fmt(format_args!(" {})", lambda.body))
            }
        }
    }
}

fn write_list(f: &mut Formatter<'_>, head: &str, nodes: &[Node]) -> std::fmt::Result {
    f.write_char('(')?;
    f.write_str(head)?;
    for node in nodes {
        f.write_fmt(format_args!(" {node}"))?;
    }
    f.write_char(')')
}

fn write_parameters(f: &mut Formatter<'_>, parameters: &[String]) -> std::fmt::Result {
    f.write_char('(')?;
    f.write_str(&parameters.join(" "))?;
    f.write_char(')')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryOperator;
    use pretty_assertions::assert_eq;

    fn int(value: i64) -> Node {
        Node::Literal(Literal::Integer(value))
    }

    #[test]
    fn display_nested_binary() {
        let node = Node::Binary(BinaryExpression {
            operator: BinaryOperator::Add,
            lhs: Box::new(int(1)),
            rhs: Box::new(Node::Binary(BinaryExpression {
                operator: BinaryOperator::Multiply,
                lhs: Box::new(int(2)),
                rhs: Box::new(int(3)),
            })),
        });

        assert_eq!(node.to_string(), "(+ 1 (* 2 3))");
    }

    #[test]
    fn display_literals() {
        assert_eq!(Node::Literal(Literal::Float(2.0)).to_string(), "2.0");
        assert_eq!(Node::Literal(Literal::String("a\nb".into())).to_string(), "\"a\\nb\"");
        assert_eq!(Node::Array(vec![int(1), int(2)]).to_string(), "[1 2]");
    }

    #[test]
    fn display_function() {
        let node = Node::FunctionDef(FunctionDef {
            name: "f".into(),
            parameters: vec!["a".into(), "b".into()],
            body: Box::new(Node::Block(vec![Node::Return(Box::new(Node::Identifier("a".into())))])),
        });

        assert_eq!(node.to_string(), "(def f (a b) (block (return a)))");
    }
}
