// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{collections::HashMap, fmt::{Display, Formatter}};

use strum::IntoStaticStr;

use crate::{BinaryOperator, Node, Token};

/// Index of a named production inside a [`Grammar`](super::Grammar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProductionId(pub(super) usize);

/// A grammar rule. Rules are plain data; [`Grammar`](super::Grammar) is the
/// only thing that interprets them.
#[derive(Clone, Debug)]
pub enum Rule {
    Token(Leaf),
    Sequence {
        items: Vec<Rule>,
        build: Build,
    },
    Choice(Vec<Rule>),
    Optional(Box<Rule>),
    Repeat(Box<Rule>),
    Expression {
        operand: Box<Rule>,
        operators: OperatorTable,
    },
    Production(ProductionId),
}

impl Rule {
    #[must_use]
    pub fn keyword(text: &'static str) -> Self {
        Self::Token(Leaf::Keyword(text))
    }

    #[must_use]
    pub const fn name() -> Self {
        Self::Token(Leaf::Name)
    }

    #[must_use]
    pub fn sequence(build: Build, items: impl Into<Vec<Rule>>) -> Self {
        Self::Sequence {
            items: items.into(),
            build,
        }
    }

    #[must_use]
    pub fn choice(options: impl Into<Vec<Rule>>) -> Self {
        Self::Choice(options.into())
    }

    #[must_use]
    pub fn optional(rule: Rule) -> Self {
        Self::Optional(Box::new(rule))
    }

    #[must_use]
    pub fn repeat(rule: Rule) -> Self {
        Self::Repeat(Box::new(rule))
    }

    #[must_use]
    pub fn expression(operand: Rule, operators: OperatorTable) -> Self {
        Self::Expression {
            operand: Box::new(operand),
            operators,
        }
    }
}

impl From<ProductionId> for Rule {
    fn from(value: ProductionId) -> Self {
        Self::Production(value)
    }
}

/// A rule matching exactly one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leaf {
    /// A keyword, operator or punctuation token with this exact text. Matched
    /// but not kept.
    Keyword(&'static str),

    /// A non-reserved name, kept as [`Fragment::Name`].
    Name,

    /// A non-reserved name, kept as an identifier node.
    Reference,

    Integer,
    Float,
    String,
}

impl Display for Leaf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword(Token::END_OF_LINE) => f.write_str("end of line"),
            Self::Keyword(text) => f.write_fmt(format_args!("`{text}`")),
            Self::Name | Self::Reference => f.write_str("name"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
        }
    }
}

/// What a [`Rule::Sequence`] turns its collected fragments into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Build {
    /// Hand the fragments to the enclosing sequence unchanged.
    Flatten,

    /// Group the fragments under a marker, so the enclosing builder can tell
    /// optional and repeated parts apart.
    Mark(Marker),

    Node(Builder),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Marker {
    Parameters,
    Extends,
    ClassBody,
    Elif,
    Else,

    Member,
    Call,
    Index,
    New,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Builder {
    Block,
    ClassDef,
    FunctionDef,
    If,
    While,
    Return,
    Use,

    Array,
    Lambda,
    Negate,
    And,
    Or,
    Postfix,
}

impl Builder {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// An intermediate result of a rule, consumed by the enclosing builder.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Node(Node),
    Name(String),
    Marked(Marker, Vec<Fragment>),
}

/// Binary operators an expression rule recognizes, with their binding
/// strength. Higher binds tighter.
#[derive(Clone, Debug, Default)]
pub struct OperatorTable {
    precedences: HashMap<BinaryOperator, u8>,
}

impl OperatorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, precedence: u8, operators: &[BinaryOperator]) -> Self {
        for operator in operators {
            self.precedences.insert(*operator, precedence);
        }
        self
    }

    #[must_use]
    pub fn precedence(&self, operator: BinaryOperator) -> Option<u8> {
        self.precedences.get(&operator).copied()
    }

    /// The operator spelled by `token`, if this table knows it.
    #[must_use]
    pub fn operator_of(&self, token: &Token) -> Option<(BinaryOperator, u8)> {
        if !token.is_identifier() {
            return None;
        }

        let operator: BinaryOperator = token.text().parse().ok()?;
        let precedence = self.precedence(operator)?;
        Some((operator, precedence))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn operator_table_only_knows_registered_operators() {
        let table = OperatorTable::new()
            .with(1, &[BinaryOperator::Add])
            .with(2, &[BinaryOperator::Multiply]);

        let plus = Token::identifier(1, Rc::from(""), "+");
        let minus = Token::identifier(1, Rc::from(""), "-");
        let name = Token::identifier(1, Rc::from(""), "plus");

        assert_eq!(table.operator_of(&plus), Some((BinaryOperator::Add, 1)));
        assert_eq!(table.operator_of(&minus), None);
        assert_eq!(table.operator_of(&name), None);
        assert_eq!(table.precedence(BinaryOperator::Multiply), Some(2));
    }
}
