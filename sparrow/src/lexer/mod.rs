// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod lexer;
mod token;
mod token_kind;

pub use self::{
    lexer::Lexer,
    token::Token,
    token_kind::TokenKind,
};
