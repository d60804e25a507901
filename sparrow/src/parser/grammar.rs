// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{collections::BTreeSet, rc::Rc};

use crate::{BinaryExpression, Lexer, Literal, Node, Token};

use super::{
    error::{ParseError, ParseResult, SourceLocation},
    Build, Fragment, Leaf, OperatorTable, ProductionId, Rule,
};

struct Production {
    name: &'static str,
    rule: Option<Rule>,
}

/// A set of named, possibly mutually recursive productions together with the
/// words no name may take.
///
/// Parsing is predictive: a rule is only entered when its leading tokens match
/// the lookahead, so a rule that does not match consumes nothing. Once a rule
/// has been entered, every mismatch is a syntax error.
pub struct Grammar {
    productions: Vec<Production>,
    reserved: BTreeSet<&'static str>,
}

impl Grammar {
    #[must_use]
    pub fn new(reserved: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            productions: Vec::new(),
            reserved: reserved.into_iter().collect(),
        }
    }

    /// Creates an empty production, so it can be referenced before its rule
    /// is known.
    pub fn define(&mut self, name: &'static str) -> ProductionId {
        self.productions.push(Production { name, rule: None });
        ProductionId(self.productions.len() - 1)
    }

    pub fn set(&mut self, id: ProductionId, rule: Rule) {
        self.productions[id.0].rule = Some(rule);
    }

    /// Defines and sets a production in one go.
    pub fn add(&mut self, name: &'static str, rule: Rule) -> ProductionId {
        let id = self.define(name);
        self.set(id, rule);
        id
    }

    #[must_use]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    #[must_use]
    pub fn production_name(&self, id: ProductionId) -> &'static str {
        self.productions[id.0].name
    }

    /// Parses one occurrence of `production`.
    pub fn parse(&self, production: ProductionId, tokens: &mut TokenStream<'_>) -> ParseResult<Vec<Fragment>> {
        let mut fragments = Vec::new();
        self.parse_into(&Rule::Production(production), tokens, &mut fragments)?;
        Ok(fragments)
    }

    /// Whether `rule` can start at the current position.
    pub fn accepts(&self, rule: &Rule, tokens: &mut TokenStream<'_>) -> bool {
        match rule {
            Rule::Token(leaf) => self.leaf_accepts(*leaf, &tokens.peek(0)),
            Rule::Sequence { items, .. } => self.sequence_accepts(items, tokens, 0),
            Rule::Choice(options) => options.iter().any(|option| self.accepts(option, tokens)),
            Rule::Optional(..) | Rule::Repeat(..) => true,
            Rule::Expression { operand, .. } => self.accepts(operand, tokens),
            Rule::Production(id) => match &self.productions[id.0].rule {
                Some(rule) => self.accepts(rule, tokens),
                None => false,
            },
        }
    }

    /// Checks the leading run of single-token items against `peek(k)`,
    /// `peek(k + 1)`, ... so that alternatives sharing a first token (such as
    /// `.new(` and `.name`) can still be told apart.
    fn sequence_accepts(&self, items: &[Rule], tokens: &mut TokenStream<'_>, k: usize) -> bool {
        let Some((first, rest)) = items.split_first() else {
            return true;
        };

        match first {
            Rule::Token(leaf) => {
                self.leaf_accepts(*leaf, &tokens.peek(k)) && self.sequence_accepts(rest, tokens, k + 1)
            }

            _ if k > 0 => true,

            Rule::Optional(inner) | Rule::Repeat(inner) => {
                self.accepts(inner, tokens) || self.sequence_accepts(rest, tokens, 0)
            }

            other => self.accepts(other, tokens),
        }
    }

    fn leaf_accepts(&self, leaf: Leaf, token: &Token) -> bool {
        match leaf {
            Leaf::Keyword(text) => token.is(text),
            Leaf::Name | Leaf::Reference => token.is_name() && !self.is_reserved(token.text()),
            Leaf::Integer => token.as_integer().is_some(),
            Leaf::Float => token.as_float().is_some(),
            Leaf::String => token.as_string().is_some(),
        }
    }

    fn parse_into(&self, rule: &Rule, tokens: &mut TokenStream<'_>, out: &mut Vec<Fragment>) -> ParseResult<()> {
        match rule {
            Rule::Token(leaf) => {
                let token = tokens.peek(0);
                if !self.leaf_accepts(*leaf, &token) {
                    return Err(self.unexpected(rule, tokens));
                }
                tokens.read();

                match leaf {
                    Leaf::Keyword(..) => (),
                    Leaf::Name => out.push(Fragment::Name(token.text().to_string())),
                    Leaf::Reference => out.push(Fragment::Node(Node::Identifier(token.text().to_string()))),
                    Leaf::Integer => out.push(Fragment::Node(Node::Literal(Literal::Integer(token.as_integer().unwrap_or_default())))),
                    Leaf::Float => out.push(Fragment::Node(Node::Literal(Literal::Float(token.as_float().unwrap_or_default())))),
                    Leaf::String => out.push(Fragment::Node(Node::Literal(Literal::String(token.as_string().unwrap_or_default().to_string())))),
                }
            }

            Rule::Sequence { items, build } => {
                let mut children = Vec::new();
                for item in items {
                    self.parse_into(item, tokens, &mut children)?;
                }

                match build {
                    Build::Flatten => out.extend(children),
                    Build::Mark(marker) => out.push(Fragment::Marked(*marker, children)),
                    Build::Node(builder) => out.push(Fragment::Node(builder.build(children)?)),
                }
            }

            Rule::Choice(options) => {
                let Some(option) = options.iter().find(|option| self.accepts(option, tokens)) else {
                    return Err(self.unexpected(rule, tokens));
                };

                self.parse_into(option, tokens, out)?;
            }

            Rule::Optional(inner) => {
                if self.accepts(inner, tokens) {
                    self.parse_into(inner, tokens, out)?;
                }
            }

            Rule::Repeat(inner) => {
                while self.accepts(inner, tokens) {
                    let before = tokens.consumed();
                    self.parse_into(inner, tokens, out)?;

                    if tokens.consumed() == before {
                        break;
                    }
                }
            }

            Rule::Expression { operand, operators } => {
                let node = self.parse_binary(operand, operators, tokens, 0)?;
                out.push(Fragment::Node(node));
            }

            Rule::Production(id) => {
                let production = &self.productions[id.0];
                log::trace!("Production `{}` at {:?}", production.name, tokens.peek(0).text());

                let Some(inner) = &production.rule else {
                    return Err(ParseError::MalformedRule { rule: production.name });
                };

                self.parse_into(inner, tokens, out)?;
            }
        }

        Ok(())
    }

    /// Precedence climbing: operands are combined left to right as long as
    /// the next operator binds at least as tight as `min_precedence`.
    fn parse_binary(&self, operand: &Rule, operators: &OperatorTable, tokens: &mut TokenStream<'_>, min_precedence: u8) -> ParseResult<Node> {
        let mut lhs = self.parse_operand(operand, tokens)?;

        loop {
            let Some((operator, precedence)) = operators.operator_of(&tokens.peek(0)) else {
                break;
            };

            if precedence < min_precedence {
                break;
            }

            tokens.read();
            let rhs = self.parse_binary(operand, operators, tokens, precedence + 1)?;

            lhs = Node::Binary(BinaryExpression {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }

        Ok(lhs)
    }

    fn parse_operand(&self, operand: &Rule, tokens: &mut TokenStream<'_>) -> ParseResult<Node> {
        let mut fragments = Vec::with_capacity(1);
        self.parse_into(operand, tokens, &mut fragments)?;

        match (fragments.pop(), fragments.is_empty()) {
            (Some(Fragment::Node(node)), true) => Ok(node),
            _ => Err(ParseError::MalformedRule { rule: "expression" }),
        }
    }

    /// The error for a token that cannot start `production`, naming every
    /// alternative the production could have started with.
    pub fn unexpected_start(&self, production: ProductionId, tokens: &mut TokenStream<'_>) -> ParseError {
        match &self.productions[production.0].rule {
            Some(rule) => self.unexpected(rule, tokens),
            None => ParseError::MalformedRule { rule: self.production_name(production) },
        }
    }

    fn unexpected(&self, rule: &Rule, tokens: &mut TokenStream<'_>) -> ParseError {
        let token = tokens.peek(0);
        let expected = self.describe(rule);

        if token.is_end_of_file() {
            return ParseError::UnexpectedEndOfFile {
                location: SourceLocation {
                    file: tokens.file_name().to_string(),
                    line: tokens.line(),
                },
                expected,
            };
        }

        ParseError::UnexpectedToken {
            location: SourceLocation {
                file: token.file().to_string(),
                line: token.line(),
            },
            text: token.to_string(),
            expected,
        }
    }

    fn describe(&self, rule: &Rule) -> String {
        match rule {
            Rule::Token(leaf) => leaf.to_string(),
            Rule::Sequence { items, .. } => {
                let mut expected = Vec::new();
                for item in items {
                    expected.push(self.describe(item));
                    if !matches!(item, Rule::Optional(..) | Rule::Repeat(..)) {
                        break;
                    }
                }
                expected.join(" or ")
            }
            Rule::Choice(options) => options.iter()
                .map(|option| self.describe(option))
                .collect::<Vec<_>>()
                .join(" or "),
            Rule::Optional(inner) | Rule::Repeat(inner) => self.describe(inner),
            Rule::Expression { .. } => "expression".to_string(),
            Rule::Production(id) => self.production_name(*id).replace('_', " "),
        }
    }
}

/// The parser's view on a [`Lexer`]: counts consumed tokens and remembers the
/// line of the last one, for reporting errors at the end of the file.
pub struct TokenStream<'lexer> {
    lexer: &'lexer mut Lexer,
    consumed: usize,
    line: usize,
}

impl<'lexer> TokenStream<'lexer> {
    #[must_use]
    pub fn new(lexer: &'lexer mut Lexer) -> Self {
        Self {
            lexer,
            consumed: 0,
            line: 1,
        }
    }

    pub fn peek(&mut self, k: usize) -> Rc<Token> {
        self.lexer.peek(k)
    }

    pub fn read(&mut self) -> Rc<Token> {
        let token = self.lexer.read();
        if !token.is_end_of_file() {
            self.consumed += 1;
            self.line = token.line();
        }
        token
    }

    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        self.lexer.file_name()
    }
}
