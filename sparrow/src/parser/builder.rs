// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{iter::Peekable, vec::IntoIter};

use crate::{
    BinaryExpression, BinaryOperator, CallExpression, ClassDef, ElifBranch, FunctionDef,
    IfStatement, IndexExpression, Lambda, MemberExpression, NewExpression, Node,
    UnaryExpression, UnaryOperator, UseStatement, WhileStatement,
};

use super::{error::{ParseError, ParseResult}, Builder, Fragment, Marker};

impl Builder {
    /// Turns the fragments collected by a sequence into a node.
    pub fn build(self, children: Vec<Fragment>) -> ParseResult<Node> {
        let mut fragments = Fragments::new(self, children);

        let node = match self {
            Self::Block => Node::Block(fragments.remaining_nodes()?),

            Self::ClassDef => {
                let name = fragments.name()?;
                let superclass = match fragments.marked(Marker::Extends) {
                    Some(extends) => Some(Fragments::new(self, extends).name()?),
                    None => None,
                };
                let body = fragments.expect_marked(Marker::ClassBody)?;
                let body = Fragments::new(self, body).remaining_nodes()?;

                Node::ClassDef(ClassDef { name, superclass, body })
            }

            Self::FunctionDef => {
                let name = fragments.name()?;
                let parameters = fragments.parameters()?;
                let body = Box::new(fragments.node()?);

                Node::FunctionDef(FunctionDef { name, parameters, body })
            }

            Self::If => {
                let condition = Box::new(fragments.node()?);
                let body = Box::new(fragments.node()?);

                let mut elifs = Vec::new();
                while let Some(elif) = fragments.marked(Marker::Elif) {
                    let mut elif = Fragments::new(self, elif);
                    elifs.push(ElifBranch {
                        condition: elif.node()?,
                        body: elif.node()?,
                    });
                    elif.finish()?;
                }

                let else_body = match fragments.marked(Marker::Else) {
                    Some(otherwise) => {
                        let mut otherwise = Fragments::new(self, otherwise);
                        let body = otherwise.node()?;
                        otherwise.finish()?;
                        Some(Box::new(body))
                    }
                    None => None,
                };

                Node::If(IfStatement { condition, body, elifs, else_body })
            }

            Self::While => Node::While(WhileStatement {
                condition: Box::new(fragments.node()?),
                body: Box::new(fragments.node()?),
            }),

            Self::Return => Node::Return(Box::new(fragments.node()?)),

            Self::Use => Node::Use(UseStatement {
                alias: fragments.name()?,
                module: fragments.name()?,
            }),

            Self::Array => Node::Array(fragments.remaining_nodes()?),

            Self::Lambda => {
                let parameters = fragments.parameters()?;
                let body = Box::new(fragments.node()?);

                Node::Lambda(Lambda { parameters, body })
            }

            Self::Negate => Node::Unary(UnaryExpression {
                operator: UnaryOperator::Negate,
                operand: Box::new(fragments.node()?),
            }),

            Self::And | Self::Or => Node::Binary(BinaryExpression {
                operator: if self == Self::And { BinaryOperator::And } else { BinaryOperator::Or },
                lhs: Box::new(fragments.node()?),
                rhs: Box::new(fragments.node()?),
            }),

            Self::Postfix => {
                let mut node = fragments.node()?;

                while let Some((marker, children)) = fragments.any_marked() {
                    let mut children = Fragments::new(self, children);

                    node = match marker {
                        Marker::Member => Node::Member(MemberExpression {
                            object: Box::new(node),
                            member: children.name()?,
                        }),

                        Marker::Call => Node::Call(CallExpression {
                            callee: Box::new(node),
                            arguments: children.remaining_nodes()?,
                        }),

                        Marker::Index => Node::Index(IndexExpression {
                            object: Box::new(node),
                            index: Box::new(children.node()?),
                        }),

                        Marker::New => Node::New(NewExpression {
                            class: Box::new(node),
                            arguments: children.remaining_nodes()?,
                        }),

                        _ => return Err(fragments.malformed()),
                    };

                    children.finish()?;
                }

                node
            }
        };

        fragments.finish()?;
        Ok(node)
    }
}

struct Fragments {
    builder: Builder,
    inner: Peekable<IntoIter<Fragment>>,
}

impl Fragments {
    fn new(builder: Builder, fragments: Vec<Fragment>) -> Self {
        Self {
            builder,
            inner: fragments.into_iter().peekable(),
        }
    }

    fn malformed(&self) -> ParseError {
        ParseError::MalformedRule { rule: self.builder.name() }
    }

    fn node(&mut self) -> ParseResult<Node> {
        match self.inner.next() {
            Some(Fragment::Node(node)) => Ok(node),
            _ => Err(self.malformed()),
        }
    }

    fn name(&mut self) -> ParseResult<String> {
        match self.inner.next() {
            Some(Fragment::Name(name)) => Ok(name),
            _ => Err(self.malformed()),
        }
    }

    /// Takes the next fragment if it is marked with `marker`.
    fn marked(&mut self, marker: Marker) -> Option<Vec<Fragment>> {
        match self.inner.peek() {
            Some(Fragment::Marked(next, _)) if *next == marker => (),
            _ => return None,
        }

        match self.inner.next() {
            Some(Fragment::Marked(_, children)) => Some(children),
            _ => None,
        }
    }

    fn expect_marked(&mut self, marker: Marker) -> ParseResult<Vec<Fragment>> {
        self.marked(marker).ok_or_else(|| self.malformed())
    }

    fn any_marked(&mut self) -> Option<(Marker, Vec<Fragment>)> {
        match self.inner.peek() {
            Some(Fragment::Marked(..)) => (),
            _ => return None,
        }

        match self.inner.next() {
            Some(Fragment::Marked(marker, children)) => Some((marker, children)),
            _ => None,
        }
    }

    fn parameters(&mut self) -> ParseResult<Vec<String>> {
        let parameters = self.expect_marked(Marker::Parameters)?;
        let mut parameters = Fragments::new(self.builder, parameters);

        let mut names = Vec::new();
        while parameters.inner.peek().is_some() {
            names.push(parameters.name()?);
        }

        Ok(names)
    }

    fn remaining_nodes(&mut self) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while self.inner.peek().is_some() {
            nodes.push(self.node()?);
        }
        Ok(nodes)
    }

    fn finish(&mut self) -> ParseResult<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(..) => Err(self.malformed()),
        }
    }
}
