// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter};

use strum::IntoStaticStr;

#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    Integer(i64),
    Float(f64),

    /// The escape-decoded contents, without the surrounding quotes.
    String(String),

    /// Names, operators, punctuation and the implicit end-of-line token.
    Identifier,

    EndOfFile,
}

impl TokenKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
