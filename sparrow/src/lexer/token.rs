// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{fmt::{Display, Formatter}, rc::Rc};

use super::TokenKind;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    kind: TokenKind,
    line: usize,
    file: Rc<str>,
    text: String,
}

impl Token {
    /// Text of the implicit statement terminator appended to every line that
    /// does not already end in a semicolon.
    pub const END_OF_LINE: &'static str = "\n";

    #[must_use]
    pub fn new(kind: TokenKind, line: usize, file: Rc<str>, text: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            file,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn identifier(line: usize, file: Rc<str>, text: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, line, file, text)
    }

    #[must_use]
    pub fn end_of_file() -> Self {
        Self::new(TokenKind::EndOfFile, 0, Rc::from(""), "")
    }

    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The source text of this token. For strings this is the decoded value.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_end_of_file(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfFile)
    }

    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    #[must_use]
    pub fn is_end_of_line(&self) -> bool {
        self.is_identifier() && self.text == Self::END_OF_LINE
    }

    /// Whether this identifier token spells a name rather than an operator or
    /// punctuation character.
    #[must_use]
    pub fn is_name(&self) -> bool {
        if !self.is_identifier() {
            return false;
        }

        let text = self.text.strip_prefix('$').unwrap_or(&self.text);
        text.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    }

    /// Whether this token is the given keyword, operator or punctuation.
    #[must_use]
    pub fn is(&self, text: &str) -> bool {
        self.is_identifier() && self.text == text
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Integer(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Float(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::String(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::EndOfFile => f.write_str("end of file"),
            TokenKind::String(str) => f.write_fmt(format_args!("\"{}\"", str.escape_debug())),
            _ if self.is_end_of_line() => f.write_str("\\n"),
            _ => f.write_str(&self.text),
        }
    }
}
