// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod builder;
mod error;
mod grammar;
mod language;
mod rule;

pub use self::{
    error::{
        ParseError,
        ParseResult,
        SourceLocation,
    },
    grammar::{
        Grammar,
        TokenStream,
    },
    language::{
        Parser,
        RESERVED_WORDS,
    },
    rule::{
        Build,
        Builder,
        Fragment,
        Leaf,
        Marker,
        OperatorTable,
        ProductionId,
        Rule,
    },
};
