// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter};

use strum::{EnumIter, EnumString, IntoStaticStr};

use super::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(EnumIter, EnumString, IntoStaticStr)]
pub enum BinaryOperator {
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
}

impl BinaryOperator {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => value.fmt(f),
            Self::Float(value) => f.write_fmt(format_args!("{value:?}")),
            Self::String(value) => f.write_fmt(format_args!("\"{}\"", value.escape_debug())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Node>,
    pub member: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpression {
    pub object: Box<Node>,
    pub index: Box<Node>,
}

/// `class.new(arguments)`
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpression {
    pub class: Box<Node>,
    pub arguments: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub parameters: Vec<String>,
    pub body: Box<Node>,
}
