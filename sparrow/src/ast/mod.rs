// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod expression;
mod node;
mod statement;

pub use self::{
    expression::{
        BinaryExpression,
        BinaryOperator,
        CallExpression,
        IndexExpression,
        Lambda,
        Literal,
        MemberExpression,
        NewExpression,
        UnaryExpression,
        UnaryOperator,
    },
    node::Node,
    statement::{
        ClassDef,
        ElifBranch,
        FunctionDef,
        IfStatement,
        UseStatement,
        WhileStatement,
    },
};
