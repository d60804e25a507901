// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use super::Node;

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub superclass: Option<String>,

    /// Method definitions and field initializers, in source order.
    pub body: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Box<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub elifs: Vec<ElifBranch>,
    pub else_body: Option<Box<Node>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElifBranch {
    pub condition: Node,
    pub body: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStatement {
    pub condition: Box<Node>,
    pub body: Box<Node>,
}

/// `use alias = module`, binding a module imported with `require` to a name.
#[derive(Clone, Debug, PartialEq)]
pub struct UseStatement {
    pub alias: String,
    pub module: String,
}
