//! Recursive descent parser for rule expressions.

use super::ast::{Logic, Node, Value};
use super::error::{RuleError, RuleResult};
use super::lexer::{Lexer, PositionedToken, Token};
use super::validator;
use crate::catalog::Catalog;

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Parser for rule expressions.
///
/// Pulls tokens from the [`Lexer`] one at a time and validates every comparison
/// against the catalog as soon as it is read, so the first problem in the text is
/// the one reported.
///
/// # Grammar
///
/// ```text
/// expr       ::= term ("OR" term)*
/// term       ::= factor ("AND" factor)*
/// factor     ::= "(" expr ")" | comparison
/// comparison ::= IDENT COMPARATOR (NUMBER | STRING)
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `( ... )` - grouping
/// 2. `AND` - binary, left-associative
/// 3. `OR` - binary, left-associative
///
/// # Example
///
/// ```
/// use rule_engine_rs::catalog::Catalog;
/// use rule_engine_rs::expr::{Logic, Node, RuleParser};
///
/// let catalog = Catalog::default();
/// let rule = RuleParser::parse("age > 30 OR department = 'Sales' AND age < 20", &catalog).unwrap();
/// assert!(matches!(rule, Node::Operator { logic: Logic::Or, .. }));
/// ```
pub struct RuleParser<'a> {
    lexer: Lexer<'a>,
    current: PositionedToken,
    catalog: &'a Catalog,
    nesting: usize,
}

impl<'a> RuleParser<'a> {
    /// Parses rule text into a validated tree.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::EmptyRule` if the text has no comparison at all (empty,
    /// whitespace, or nothing but parentheses).
    ///
    /// Returns `RuleError::Syntax` for bad characters, misplaced operators,
    /// unbalanced parentheses, nesting deeper than [`MAX_NESTING`] or trailing input.
    ///
    /// Returns `RuleError::UnknownAttribute`, `RuleError::InvalidOperator` or
    /// `RuleError::TypeMismatch` for the first comparison the catalog rejects.
    pub fn parse(input: &'a str, catalog: &'a Catalog) -> RuleResult<Node> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        if current.token == Token::Eof {
            return Err(RuleError::EmptyRule);
        }

        let mut parser = Self {
            lexer,
            current,
            catalog,
            nesting: 0,
        };

        let result = parser.parse_expression().and_then(|node| {
            parser.expect_end()?;
            Ok(node)
        });

        match result {
            Err(RuleError::Syntax { .. }) if only_parentheses(input) => Err(RuleError::EmptyRule),
            other => other,
        }
    }

    /// Consumes the current token and returns it, pulling the next one from the lexer.
    fn advance(&mut self) -> RuleResult<PositionedToken> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Checks if the current token is the given connective.
    fn check_logic(&self, expected: Logic) -> bool {
        self.current.token == Token::Logic(expected)
    }

    /// Parses the top-level expression (OR expression).
    fn parse_expression(&mut self) -> RuleResult<Node> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `term ("OR" term)*`
    fn parse_or_expr(&mut self) -> RuleResult<Node> {
        let mut left = self.parse_and_expr()?;

        while self.check_logic(Logic::Or) {
            self.advance()?; // consume 'OR'
            let right = self.parse_and_expr()?;
            left = Node::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `factor ("AND" factor)*`
    fn parse_and_expr(&mut self) -> RuleResult<Node> {
        let mut left = self.parse_factor()?;

        while self.check_logic(Logic::And) {
            self.advance()?; // consume 'AND'
            let right = self.parse_factor()?;
            left = Node::and(left, right);
        }

        Ok(left)
    }

    /// Parses factors: `"(" expr ")" | comparison`
    fn parse_factor(&mut self) -> RuleResult<Node> {
        match &self.current.token {
            Token::OpenParen => {
                let open = self.advance()?;
                if self.nesting == MAX_NESTING {
                    return Err(RuleError::syntax(
                        open.position,
                        format!("parentheses nested deeper than {}", MAX_NESTING),
                    ));
                }
                self.nesting += 1;
                let inner = self.parse_expression()?;
                self.nesting -= 1;
                if self.current.token != Token::CloseParen {
                    return Err(RuleError::syntax(
                        self.current.position,
                        format!(
                            "expected ')' to close '(' at position {}, found {}",
                            open.position, self.current.token
                        ),
                    ));
                }
                self.advance()?; // consume ')'
                Ok(inner)
            }
            Token::Ident(_) => self.parse_comparison(),
            other => Err(RuleError::syntax(
                self.current.position,
                format!("expected attribute name or '(', found {}", other),
            )),
        }
    }

    /// Parses and validates `IDENT COMPARATOR (NUMBER | STRING)`.
    fn parse_comparison(&mut self) -> RuleResult<Node> {
        let ident = self.advance()?;
        let Token::Ident(attribute) = ident.token else {
            return Err(RuleError::syntax(ident.position, "expected attribute name"));
        };

        let comparator = match &self.current.token {
            Token::Comparator(comparator) => *comparator,
            other => {
                return Err(RuleError::syntax(
                    self.current.position,
                    format!("expected comparison operator after '{}', found {}", attribute, other),
                ))
            }
        };
        self.advance()?;

        let value = match &self.current.token {
            Token::Number(n) => Value::Number(*n),
            Token::Str(s) => Value::Text(s.clone()),
            other => {
                return Err(RuleError::syntax(
                    self.current.position,
                    format!("expected number or quoted string, found {}", other),
                ))
            }
        };
        self.advance()?;

        let comparison = validator::checked_comparison(self.catalog, &attribute, comparator, value)
            .map_err(|e| e.at(ident.position))?;
        Ok(Node::operand(comparison))
    }

    /// Checks that all input was consumed.
    fn expect_end(&self) -> RuleResult<()> {
        match &self.current.token {
            Token::Eof => Ok(()),
            Token::CloseParen => Err(RuleError::syntax(
                self.current.position,
                "unmatched ')'",
            )),
            other => Err(RuleError::syntax(
                self.current.position,
                format!("unexpected {} after complete expression", other),
            )),
        }
    }
}

/// Returns true if the text lexes to nothing but parentheses.
fn only_parentheses(input: &str) -> bool {
    Lexer::new(input).all(|token| {
        matches!(
            token,
            Ok(PositionedToken {
                token: Token::OpenParen | Token::CloseParen | Token::Eof,
                ..
            })
        )
    })
}
