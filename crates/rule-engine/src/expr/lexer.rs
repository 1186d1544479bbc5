//! Lexer (tokenizer) for rule expressions.

use std::fmt;

use super::ast::{Comparator, Logic};
use super::error::{RuleError, RuleResult};

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An attribute name.
    Ident(String),

    /// A comparison operator (`>`, `<`, `=`, `>=`, `<=`, `!=`).
    Comparator(Comparator),

    /// `AND` or `OR`, matched case-insensitively.
    Logic(Logic),

    /// A numeric literal.
    Number(f64),

    /// A quoted text literal, with escapes resolved.
    Str(String),

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// End of input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Comparator(c) => write!(f, "'{}'", c),
            Token::Logic(l) => write!(f, "'{}'", l),
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::OpenParen => write!(f, "'('"),
            Token::CloseParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of rule"),
        }
    }
}

/// Lexer for tokenizing rule expressions.
///
/// Tokens are produced on demand. As an [`Iterator`] the lexer yields every token
/// up to and including [`Token::Eof`], or stops after the first error. To scan
/// the same text again, create a new lexer over it.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    /// Set once `Eof` or an error has been yielded by the iterator.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            finished: false,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Peeks at the character after the next one.
    fn peek_second(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads an identifier: a letter or underscore followed by letters, digits or underscores.
    fn read_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        &input[start..self.position]
    }

    /// Reads an optionally negative decimal number.
    fn read_number(&mut self, start: usize) -> RuleResult<f64> {
        if self.peek() == Some('-') {
            self.next_char();
        }
        self.skip_digits();
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
            self.skip_digits();
        }

        let text = &self.input[start..self.position];
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(RuleError::syntax(
                start,
                format!("number '{}' is out of range", text),
            )),
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
        }
    }

    /// Reads a quoted string (single or double quotes), resolving backslash escapes.
    fn read_quoted_string(&mut self, quote_char: char, start: usize) -> RuleResult<String> {
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote_char {
                return Ok(result);
            }
            if c == '\\' {
                match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                }
            } else {
                result.push(c);
            }
        }
        Err(RuleError::syntax(start, "unterminated string literal"))
    }

    /// Returns the next token with its position.
    ///
    /// Returns [`Token::Eof`] at the end of input, and keeps returning it if
    /// called again.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Syntax` for a character that cannot start a token,
    /// an unterminated string, or a number that does not fit in an `f64`.
    pub fn next_token(&mut self) -> RuleResult<PositionedToken> {
        self.skip_whitespace();

        let token_start = self.position;
        let Some(c) = self.peek() else {
            return Ok(PositionedToken {
                token: Token::Eof,
                position: token_start,
            });
        };

        let token = match c {
            '(' => {
                self.next_char();
                Token::OpenParen
            }
            ')' => {
                self.next_char();
                Token::CloseParen
            }
            '=' => {
                self.next_char();
                Token::Comparator(Comparator::Eq)
            }
            '>' | '<' => {
                self.next_char();
                let or_equal = self.peek() == Some('=');
                if or_equal {
                    self.next_char();
                }
                Token::Comparator(match (c, or_equal) {
                    ('>', false) => Comparator::Gt,
                    ('>', true) => Comparator::Ge,
                    ('<', false) => Comparator::Lt,
                    _ => Comparator::Le,
                })
            }
            '!' => {
                self.next_char();
                if self.peek() != Some('=') {
                    return Err(RuleError::unexpected_character(token_start, '!'));
                }
                self.next_char();
                Token::Comparator(Comparator::Ne)
            }
            '\'' | '"' => Token::Str(self.read_quoted_string(c, token_start)?),
            '-' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => {
                Token::Number(self.read_number(token_start)?)
            }
            _ if c.is_ascii_digit() => Token::Number(self.read_number(token_start)?),
            _ if c.is_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                if ident.eq_ignore_ascii_case("and") {
                    Token::Logic(Logic::And)
                } else if ident.eq_ignore_ascii_case("or") {
                    Token::Logic(Logic::Or)
                } else {
                    Token::Ident(ident.to_string())
                }
            }
            _ => return Err(RuleError::unexpected_character(token_start, c)),
        };

        Ok(PositionedToken {
            token,
            position: token_start,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = RuleResult<PositionedToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(PositionedToken {
                token: Token::Eof, ..
            })
            | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes a whole rule, ending with [`Token::Eof`].
///
/// # Errors
///
/// Returns the first `RuleError::Syntax` encountered.
pub fn tokenize(input: &str) -> RuleResult<Vec<PositionedToken>> {
    Lexer::new(input).collect()
}
