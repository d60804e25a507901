// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    borrow::Cow,
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Cursor},
    path::Path,
    rc::Rc,
    sync::LazyLock,
};

use regex::{Captures, Regex};

use super::{Token, TokenKind};

/// One alternative per lexeme, tried in this order at every position of a line.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\s*(?:"#,
        r#"(?P<require>require [[:alnum:]_]+(?:\.[[:alnum:]_]+)* as [[:alnum:]_]+)"#,
        r#"|(?P<comment>//.*)"#,
        r#"|(?P<float>[0-9]+\.[0-9]+)"#,
        r#"|(?P<integer>[0-9]+)"#,
        r#"|(?P<string>"(?:\\"|\\\\|\\n|[^"])*")"#,
        r#"|(?P<identifier>\$?[A-Z_a-z][A-Z_a-z0-9]*|!=|==|<=|>=|&&|\|\||[[:punct:]])"#,
        r#")?"#,
    ))
    .expect("token pattern must compile")
});

/// A line-at-a-time lexer with unbounded lookahead.
///
/// Tokens are scanned lazily: [`Lexer::read`] and [`Lexer::peek`] only pull
/// new lines from the input when the buffer does not hold enough tokens yet.
pub struct Lexer {
    input: Option<Box<dyn BufRead>>,
    file_name: Rc<str>,
    line_number: usize,
    has_more: bool,
    queue: VecDeque<Rc<Token>>,
    end_of_file: Rc<Token>,
}

impl Lexer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: None,
            file_name: Rc::from(""),
            line_number: 1,
            has_more: false,
            queue: VecDeque::new(),
            end_of_file: Rc::new(Token::end_of_file()),
        }
    }

    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut this = Self::new();
        this.parse_text(text);
        this
    }

    /// Starts a new session over an in-memory source.
    pub fn parse_text(&mut self, text: impl Into<String>) {
        self.reset(Rc::from(""));
        self.input = Some(Box::new(Cursor::new(text.into())));
        log::debug!("Lexing in-memory source");
    }

    /// Starts a new session over the file at `path`.
    ///
    /// A file that cannot be opened is not an error: the session simply
    /// produces no tokens. The return value tells whether the file was opened.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.reset(Rc::from(path.to_string_lossy().as_ref()));

        match File::open(path) {
            Ok(file) => {
                self.input = Some(Box::new(BufReader::new(file)));
                log::debug!("Lexing {}", path.display());
                true
            }

            Err(e) => {
                log::warn!("Failed to open {}: {e}", path.display());
                false
            }
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Removes and returns the next token, or the end-of-file token when the
    /// input is exhausted.
    pub fn read(&mut self) -> Rc<Token> {
        if self.fill_queue(0) {
            if let Some(token) = self.queue.pop_front() {
                return token;
            }
        }

        Rc::clone(&self.end_of_file)
    }

    /// Returns the token `k` positions after the next one without consuming
    /// anything. `peek(0)` is the token [`Lexer::read`] would return.
    pub fn peek(&mut self, k: usize) -> Rc<Token> {
        if self.fill_queue(k) {
            if let Some(token) = self.queue.get(k) {
                return Rc::clone(token);
            }
        }

        Rc::clone(&self.end_of_file)
    }

    fn fill_queue(&mut self, index: usize) -> bool {
        while index >= self.queue.len() {
            if !self.has_more {
                return false;
            }

            self.scan_next_line();
        }

        true
    }

    fn scan_next_line(&mut self) {
        let Some(input) = self.input.as_mut() else {
            self.has_more = false;
            return;
        };

        let mut bytes = Vec::new();
        match input.read_until(b'\n', &mut bytes) {
            Ok(0) => {
                self.has_more = false;
                return;
            }

            Ok(..) => (),

            Err(e) => {
                log::warn!("Failed to read line {} of {:?}: {e}", self.line_number, self.file_name);
                self.has_more = false;
                return;
            }
        }

        let line = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(..) = line {
            log::warn!("Line {} of {:?} is not valid UTF-8", self.line_number, self.file_name);
        }

        let line = line.trim_end_matches(['\n', '\r']);
        log::trace!("Line {}: {line:?}", self.line_number);

        let first_of_line = self.queue.len();
        for captures in TOKEN_PATTERN.captures_iter(line) {
            if let Some(token) = self.token_from_captures(&captures) {
                self.queue.push_back(Rc::new(token));
            }
        }

        let produced_tokens = self.queue.len() > first_of_line;
        let ends_in_semicolon = self.queue.back().is_some_and(|token| token.is(";"));
        if produced_tokens && !ends_in_semicolon {
            let end_of_line = Token::identifier(self.line_number, Rc::clone(&self.file_name), Token::END_OF_LINE);
            self.queue.push_back(Rc::new(end_of_line));
        }

        self.line_number += 1;
    }

    fn token_from_captures(&self, captures: &Captures<'_>) -> Option<Token> {
        let file = Rc::clone(&self.file_name);
        let line = self.line_number;

        if captures.name("require").is_some() || captures.name("comment").is_some() {
            return None;
        }

        if let Some(float) = captures.name("float") {
            let value = float.as_str().parse().unwrap_or_default();
            return Some(Token::new(TokenKind::Float(value), line, file, float.as_str()));
        }

        if let Some(integer) = captures.name("integer") {
            let value = integer.as_str().parse().unwrap_or_else(|_| {
                log::warn!("Integer literal {} on line {line} does not fit in 64 bits", integer.as_str());
                i64::MAX
            });
            return Some(Token::new(TokenKind::Integer(value), line, file, integer.as_str()));
        }

        if let Some(string) = captures.name("string") {
            let raw = string.as_str();
            let value = decode_escapes(&raw[1..raw.len() - 1]);
            return Some(Token::new(TokenKind::String(value.clone()), line, file, value));
        }

        let identifier = captures.name("identifier")?;
        Some(Token::identifier(line, file, identifier.as_str()))
    }

    fn reset(&mut self, file_name: Rc<str>) {
        self.queue.clear();
        self.input = None;
        self.has_more = true;
        self.line_number = 1;
        self.file_name = file_name;
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Lexer {
    type Item = Rc<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.read();
        if token.is_end_of_file() {
            None
        } else {
            Some(token)
        }
    }
}

fn decode_escapes(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let decoded = match chars.peek() {
            Some('0') => '\0',
            Some('n') => '\n',
            Some('t') => '\t',
            Some('\\') => '\\',

            // Kept verbatim; the next character is pushed on the next round.
            _ => {
                result.push('\\');
                continue;
            }
        };

        chars.next();
        result.push(decoded);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn texts(source: &str) -> Vec<String> {
        Lexer::with_text(source)
            .map(|token| token.text().to_string())
            .collect()
    }

    #[rstest]
    #[case("a", &["a", "\n"])]
    #[case("a;", &["a", ";"])]
    #[case("x = y + 1", &["x", "=", "y", "+", "1", "\n"])]
    #[case("a != b == c <= d >= e && f || g", &["a", "!=", "b", "==", "c", "<=", "d", ">=", "e", "&&", "f", "||", "g", "\n"])]
    #[case("$self.name", &["$self", ".", "name", "\n"])]
    #[case("f(a, b)[0]", &["f", "(", "a", ",", "b", ")", "[", "0", "]", "\n"])]
    #[case("x // trailing comment", &["x", "\n"])]
    #[case("require foo.bar.baz as qux", &[])]
    #[case("require foo as bar; x", &[";", "x", "\n"])]
    #[case("required", &["required", "\n"])]
    #[case("a < -b", &["a", "<", "-", "b", "\n"])]
    fn scans_line(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(texts(input), expected);
    }

    #[rstest]
    #[case("   ")]
    #[case("// only a comment")]
    #[case("\t// indented comment")]
    #[case("")]
    fn blank_lines_produce_nothing(#[case] input: &str) {
        assert_eq!(texts(input), Vec::<String>::new());
    }

    #[test]
    fn blank_line_after_tokens_adds_no_terminator() {
        let mut lexer = Lexer::with_text("a\n\n// nothing\nb");

        // Scans all four lines before anything is consumed.
        assert_eq!(lexer.peek(3).text(), "\n");

        let all: Vec<String> = lexer.map(|token| token.text().to_string()).collect();
        assert_eq!(all, ["a", "\n", "b", "\n"]);
    }

    #[rstest]
    #[case("42", TokenKind::Integer(42))]
    #[case("007", TokenKind::Integer(7))]
    #[case("3.25", TokenKind::Float(3.25))]
    #[case("99999999999999999999", TokenKind::Integer(i64::MAX))]
    #[case(r#""hallo""#, TokenKind::String("hallo".into()))]
    #[case(r#""a\nb\\c""#, TokenKind::String("a\nb\\c".into()))]
    #[case(r#""a\tb\0""#, TokenKind::String("a\tb\0".into()))]
    #[case(r#""a\qb""#, TokenKind::String("a\\qb".into()))]
    #[case(r#""a\"b""#, TokenKind::String("a\\\"b".into()))]
    #[case(r#""a // b""#, TokenKind::String("a // b".into()))]
    #[case(r#""""#, TokenKind::String(String::new()))]
    #[case("naam", TokenKind::Identifier)]
    fn literal_kinds(#[case] input: &str, #[case] expected: TokenKind) {
        let mut lexer = Lexer::with_text(input);
        assert_eq!(lexer.read().kind(), &expected);
    }

    #[test]
    fn trailing_backslash_is_kept() {
        assert_eq!(decode_escapes("ab\\"), "ab\\");
        assert_eq!(decode_escapes("\\\\\\"), "\\\\");
    }

    #[test]
    fn float_requires_fraction() {
        assert_eq!(texts("1."), ["1", ".", "\n"]);
        assert_eq!(texts("1.5.2"), ["1.5", ".", "2", "\n"]);
    }

    #[test]
    fn peek_is_idempotent() {
        let mut lexer = Lexer::with_text("a b\nc");

        let first = lexer.peek(0);
        assert_eq!(lexer.peek(0), first);
        assert_eq!(lexer.peek(2).text(), "\n");
        assert_eq!(lexer.peek(3).text(), "c");
        assert_eq!(lexer.peek(0), first);

        let read = lexer.read();
        assert!(Rc::ptr_eq(&read, &first));
        assert_eq!(lexer.peek(0).text(), "b");
    }

    #[test]
    fn end_of_file_is_shared_and_permanent() {
        let mut lexer = Lexer::with_text("a");
        assert_eq!(lexer.read().text(), "a");
        assert_eq!(lexer.read().text(), "\n");

        let eof = lexer.read();
        assert!(eof.is_end_of_file());
        assert!(Rc::ptr_eq(&eof, &lexer.read()));
        assert!(Rc::ptr_eq(&eof, &lexer.peek(5)));
    }

    #[test]
    fn line_numbers_are_one_based() {
        let lines: Vec<usize> = Lexer::with_text("a\n\nb c")
            .map(|token| token.line())
            .collect();
        assert_eq!(lines, [1, 1, 3, 3, 3]);
    }

    #[test]
    fn restarting_discards_buffered_tokens() {
        let mut lexer = Lexer::with_text("a b c");
        assert_eq!(lexer.peek(2).text(), "c");

        lexer.parse_text("d");
        assert_eq!(lexer.read().text(), "d");
        assert_eq!(lexer.read().line(), 1);
    }

    #[test]
    fn missing_file_produces_only_end_of_file() {
        let mut lexer = Lexer::new();
        let opened = lexer.parse_file("/this/path/does/not/exist.sp");

        assert!(!opened);
        assert_eq!(lexer.file_name(), "/this/path/does/not/exist.sp");
        assert!(lexer.read().is_end_of_file());
        assert!(lexer.peek(0).is_end_of_file());
    }

    #[test]
    fn unopened_lexer_produces_only_end_of_file() {
        let mut lexer = Lexer::new();
        assert!(lexer.read().is_end_of_file());
    }

    #[test]
    fn invalid_utf8_does_not_end_the_input() {
        let path = std::env::temp_dir().join(format!("sparrow-lexer-{}-latin1.sp", std::process::id()));
        std::fs::write(&path, b"a = 1\nb = \"\xff\"\nc = 3\n").unwrap();

        let mut lexer = Lexer::new();
        assert!(lexer.parse_file(&path));
        let all: Vec<String> = lexer.map(|token| token.text().to_string()).collect();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(all, ["a", "=", "1", "\n", "b", "=", "\u{FFFD}", "\n", "c", "=", "3", "\n"]);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        assert_eq!(texts("a\r\nb\r\n"), ["a", "\n", "b", "\n"]);
    }
}
