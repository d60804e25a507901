// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{fmt::Display, rc::Rc};

use crate::FuncObject;

/// What an evaluator stores in an [`Environment`](crate::Environment).
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,

    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Function(Rc<FuncObject>),
}

impl Value {
    #[must_use]
    pub fn as_function(&self) -> Option<&Rc<FuncObject>> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(i) => i.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::String(str) => f.write_str(str),
            Self::Function(function) => f.write_fmt(format_args!("<function ({})>", function.parameters().join(", "))),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(Rc::from(value))
    }
}
