// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

mod ast;
mod config;
mod environment;
mod lexer;
pub mod parser;
mod value;

pub use self::{
    ast::*,
    config::{ConfigError, ConfigRoot, ConfigSectionLog, ConfigSectionOutput, OutputFormat, CONFIG_FILE_NAME},
    environment::{Environment, FuncObject},
    lexer::{Lexer, Token, TokenKind},
    parser::{ParseError, ParseResult, Parser, SourceLocation},
    value::Value,
};
