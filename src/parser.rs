use log::trace;

use crate::ast::{BinaryOperator, Node};
use crate::config::Limits;
use crate::error::SyntaxError;
use crate::token::{Operator, Span, Token, TokenKind};

const EXPECTED_OPERAND: &str = "a number, function or '('";

pub struct Parser<'tokens, 'source> {
    tokens: &'tokens [Token<'source>],
    cursor: usize,
    depth: usize,
    max_depth: usize,
    max_height: usize,
}

/// Builds an expression tree out of `tokens`, consuming all of them.
pub fn parse(tokens: &[Token], limits: &Limits) -> Result<Node, SyntaxError> {
    Parser::new(tokens, limits).parse()
}

impl<'tokens, 'source> Parser<'tokens, 'source> {
    pub fn new(tokens: &'tokens [Token<'source>], limits: &Limits) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
            max_depth: limits.max_depth,
            max_height: limits.max_tree_height,
        }
    }

    pub fn parse(&mut self) -> Result<Node, SyntaxError> {
        let result = self.parse_expression_within(0)?;

        // Ensure we've consumed all tokens
        if let Some(token) = self.next() {
            return Err(match token.kind {
                TokenKind::Operator(Operator::CloseParen) => SyntaxError::UnmatchedParenthesis {
                    at: token.span.into(),
                },
                _ => SyntaxError::TrailingInput {
                    found: token.kind.to_string(),
                    at: token.span.into(),
                },
            });
        }

        trace!("parsed {result}");
        Ok(result)
    }

    fn peek(&self) -> Option<&'tokens Token<'source>> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<&'tokens Token<'source>> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    fn end_of_input(&self) -> Span {
        let end = self.tokens.last().map_or(0, |t| t.span.end);
        Span { start: end, end }
    }

    fn enter(&mut self, span: Span) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::TooComplex {
                max_depth: self.max_depth,
                at: span.into(),
            });
        }

        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Long `+`/`*` chains are built iteratively but still produce a tall tree,
    // which everything downstream walks recursively.
    fn check_height(&self, height: usize, span: Span) -> Result<(), SyntaxError> {
        if height > self.max_height {
            return Err(SyntaxError::TooTall {
                max_height: self.max_height,
                at: span.into(),
            });
        }

        Ok(())
    }

    fn previous_span(&self) -> Span {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or_else(|| self.end_of_input(), |token| token.span)
    }

    fn parse_expression_within(&mut self, min_bp: u8) -> Result<Node, SyntaxError> {
        let lhs = self.parse_prefix()?;
        self.parse_infix(lhs, min_bp)
    }

    fn parse_prefix(&mut self) -> Result<Node, SyntaxError> {
        let Some(token) = self.next() else {
            return Err(SyntaxError::UnexpectedEnd {
                expected: EXPECTED_OPERAND,
                at: self.end_of_input().into(),
            });
        };

        match token.kind {
            // The lexer folds a leading minus into the literal, but `^` still binds
            // tighter than negation: `-2^2` is `-(2^2)`.
            TokenKind::Number(value) if value.is_sign_negative() && self.next_is(Operator::Caret) => {
                self.enter(token.span)?;
                let ((), r_bp) = prefix_binding_power();
                let magnitude = self.parse_infix(Node::Literal(-value), r_bp)?;
                self.leave();

                Ok(Node::negate(magnitude))
            }
            TokenKind::Number(value) => Ok(Node::Literal(value)),
            TokenKind::Operator(Operator::Minus) => {
                self.enter(token.span)?;
                let ((), r_bp) = prefix_binding_power();
                let operand = self.parse_expression_within(r_bp)?;
                self.leave();

                Ok(Node::negate(operand))
            }
            TokenKind::Operator(Operator::OpenParen) => {
                self.enter(token.span)?;
                let inner = self.parse_expression_within(0)?;
                self.expect_close(token.span)?;
                self.leave();

                Ok(inner)
            }
            TokenKind::Function(name) => {
                let open = match self.next() {
                    Some(open) if open.kind == TokenKind::Operator(Operator::OpenParen) => open,
                    Some(other) => {
                        return Err(SyntaxError::MissingParenthesis {
                            function: name.to_string(),
                            at: other.span.into(),
                        });
                    }
                    None => {
                        return Err(SyntaxError::MissingParenthesis {
                            function: name.to_string(),
                            at: self.end_of_input().into(),
                        });
                    }
                };

                self.enter(open.span)?;
                let argument = self.parse_expression_within(0)?;
                self.expect_close(open.span)?;
                self.leave();

                Ok(Node::call(name, argument))
            }
            ref kind => Err(SyntaxError::UnexpectedToken {
                expected: EXPECTED_OPERAND,
                found: kind.to_string(),
                at: token.span.into(),
            }),
        }
    }

    fn parse_infix(&mut self, mut lhs: Node, min_bp: u8) -> Result<Node, SyntaxError> {
        let mut height = lhs.height();
        self.check_height(height, self.previous_span())?;

        loop {
            let (op, span) = match self.peek() {
                Some(Token {
                    kind: TokenKind::Operator(op),
                    span,
                }) => (*op, *span),
                // Anything else ends this expression; the caller decides whether that's valid
                _ => break,
            };

            let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.next();

            let op = BinaryOperator::from(op);
            let rhs = if op == BinaryOperator::Pow {
                // Right associative, so a chain of `^` recurses once per operator
                self.enter(span)?;
                let rhs = self.parse_expression_within(r_bp)?;
                self.leave();
                rhs
            } else {
                self.parse_expression_within(r_bp)?
            };

            height = height.max(rhs.height()) + 1;
            self.check_height(height, span)?;
            lhs = Node::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn next_is(&self, op: Operator) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Operator(o), .. }) if *o == op)
    }

    fn expect_close(&mut self, open: Span) -> Result<(), SyntaxError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Operator(Operator::CloseParen),
                ..
            }) => Ok(()),
            Some(token) => Err(SyntaxError::UnexpectedToken {
                expected: "')'",
                found: token.kind.to_string(),
                at: token.span.into(),
            }),
            None => Err(SyntaxError::UnclosedParenthesis { at: open.into() }),
        }
    }
}

fn prefix_binding_power() -> ((), u8) {
    ((), 5)
}

fn infix_binding_power(op: Operator) -> Option<(u8, u8)> {
    Some(match op {
        Operator::Plus | Operator::Minus => (1, 2),
        Operator::Star | Operator::Slash => (3, 4),
        Operator::Caret => (8, 7), // Right associative

        Operator::OpenParen | Operator::CloseParen => return None,
    })
}
