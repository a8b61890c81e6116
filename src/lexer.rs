//! Character-level lexer turning anonymized text into tokens.
//!
//! Three token shapes come out of the scanner:
//!
//! - whole quoted strings, delimiters included (`"a b"`, `'x'`, `` `t` ``)
//! - maximal runs of alphanumerics and `_`, with a `.` glued in when a digit
//!   follows it (`3.14`, `_variable0_`)
//! - any other non-whitespace character on its own (`+`, `{`, `.`)
//!
//! Whitespace separates tokens and never produces one.
//!
//! The string state is a single flag. It does not remember which delimiter
//! opened the string, so `'a"` opens and closes a string just like `'a'`.
//! An unterminated string absorbs the rest of the input and is flushed as
//! one token at the end.

use crate::models::Token;

/// Scan `text` into its token sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        lexer.feed(c, next);
    }

    lexer.finish()
}

/// Scanner state between characters.
#[derive(Debug, Default)]
struct Lexer {
    in_string: bool,
    name: String,
    string: String,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new() -> Self {
        Self::default()
    }

    fn feed(&mut self, c: char, next: Option<char>) {
        if is_string_delimiter(c) {
            self.in_string = !self.in_string;
            self.string.push(c);
            return;
        }

        if self.in_string {
            self.string.push(c);
            return;
        }

        if is_name_char(c) {
            self.name.push(c);
            return;
        }

        if c == '.' && next.map(|n| n.is_ascii_digit()).unwrap_or(false) {
            self.name.push(c);
            return;
        }

        self.flush();

        if !c.is_whitespace() {
            self.tokens.push(Token::new(c.to_string()));
        }
    }

    /// Emit pending buffers, string before name.
    fn flush(&mut self) {
        if !self.string.is_empty() {
            self.tokens.push(Token::new(std::mem::take(&mut self.string)));
        }
        if !self.name.is_empty() {
            self.tokens.push(Token::new(std::mem::take(&mut self.name)));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush();
        self.tokens
    }
}

fn is_string_delimiter(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
