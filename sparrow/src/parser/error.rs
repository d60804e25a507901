// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Formatter};

use strum::AsRefStr;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.file.is_empty() {
            f.write_fmt(format_args!("<text>:{}", self.line))
        } else {
            f.write_fmt(format_args!("{}:{}", self.file, self.line))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error, AsRefStr)]
pub enum ParseError {
    #[error("{location}: unexpected `{text}`, expected {expected}")]
    UnexpectedToken {
        location: SourceLocation,
        text: String,
        expected: String,
    },

    #[error("{location}: unexpected end of file, expected {expected}")]
    UnexpectedEndOfFile {
        location: SourceLocation,
        expected: String,
    },

    #[error("rule `{rule}` received fragments it cannot build from")]
    MalformedRule {
        rule: &'static str,
    },
}

impl ParseError {
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::UnexpectedToken { location, .. } => Some(location),
            Self::UnexpectedEndOfFile { location, .. } => Some(location),
            Self::MalformedRule { .. } => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.as_ref()
    }
}
