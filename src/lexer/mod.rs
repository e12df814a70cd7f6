pub(crate) mod numbers;

use log::trace;
use numbers::{NumberParser, ParsedNumber};

use crate::config::Limits;
use crate::error::LexError;
use crate::token::{Operator, Span, Token, TokenKind};

pub struct Lexer<'source> {
    source: &'source str,
    position: usize,
    allow_functions: bool,
    // Decides whether a `-` starts a negative literal or is a binary operator.
    previous: Option<TokenKind<'source>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str, limits: &Limits) -> Self {
        Self {
            source,
            position: 0,
            allow_functions: limits.allow_functions,
            previous: None,
        }
    }

    fn rest(&self) -> &'source [u8] {
        &self.source.as_bytes()[self.position..]
    }

    fn minus_is_unary(&self) -> bool {
        match &self.previous {
            None => true,
            Some(TokenKind::Operator(op)) => *op != Operator::CloseParen,
            Some(_) => false,
        }
    }
}

macro_rules! token {
    ($kind:expr, $start:ident, $self:ident) => {
        Token {
            kind: $kind,
            span: Span {
                start: $start,
                end: $self.position,
            },
        }
    };
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token<'source>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = loop {
            let c = *self.rest().first()?;
            let c_start = self.position;
            self.position += 1;

            let kind = match c {
                b'+' => TokenKind::Operator(Operator::Plus),
                b'-' => {
                    let starts_literal = matches!(self.rest().first(), Some(b'0'..=b'9' | b'.'));
                    if starts_literal && self.minus_is_unary() {
                        break self.parse_number(c_start, self.position);
                    }

                    TokenKind::Operator(Operator::Minus)
                }
                b'*' => TokenKind::Operator(Operator::Star),
                b'/' => TokenKind::Operator(Operator::Slash),
                b'^' => TokenKind::Operator(Operator::Caret),
                b'(' => TokenKind::Operator(Operator::OpenParen),
                b')' => TokenKind::Operator(Operator::CloseParen),

                b'0'..=b'9' | b'.' => break self.parse_number(c_start, c_start),

                b'a'..=b'z' | b'A'..=b'Z' if self.allow_functions => {
                    break Ok(self.parse_function_name(c_start));
                }

                c if c.is_ascii_whitespace() => continue,

                _ => {
                    // Report the whole character, not just its first byte
                    let character = self.source[c_start..].chars().next()?;
                    self.position = c_start + character.len_utf8();
                    break Err(LexError::UnexpectedCharacter {
                        character,
                        at: (c_start..self.position).into(),
                    });
                }
            };

            break Ok(token!(kind, c_start, self));
        };

        if let Ok(token) = &token {
            trace!("lexed {} at {}..{}", token.kind, token.span.start, token.span.end);
            self.previous = Some(token.kind.clone());
        }

        Some(token)
    }
}

impl<'source> Lexer<'source> {
    /// `start` includes a leading `-` if one was folded into the literal; `digits` is
    /// where the unsigned part begins.
    fn parse_number(&mut self, start: usize, digits: usize) -> Result<Token<'source>, LexError> {
        let negative = digits > start;

        let ParsedNumber { value, literal_len } =
            NumberParser::parse_number(&self.source.as_bytes()[digits..]).map_err(|e| {
                LexError::MalformedNumber {
                    literal: self.source[start..digits + e.span.end].to_string(),
                    at: (start..digits + e.span.end).into(),
                    reason: e.message,
                }
            })?;

        self.position = digits + literal_len;

        let value = if negative { -value } else { value };
        Ok(token!(TokenKind::Number(value), start, self))
    }

    fn parse_function_name(&mut self, start: usize) -> Token<'source> {
        let len = self
            .rest()
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        self.position += len;

        token!(
            TokenKind::Function(&self.source[start..self.position]),
            start,
            self
        )
    }
}

/// Splits `input` into tokens and rejects adjacent tokens that can never form a
/// valid expression.
pub fn tokenize<'source>(
    input: &'source str,
    limits: &Limits,
) -> Result<Vec<Token<'source>>, LexError> {
    if input.len() > limits.max_input_len {
        return Err(LexError::InputTooLong {
            len: input.len(),
            max: limits.max_input_len,
        });
    }

    let tokens = Lexer::new(input, limits).collect::<Result<Vec<_>, _>>()?;
    validate_adjacency(&tokens)?;

    Ok(tokens)
}

fn validate_adjacency(tokens: &[Token]) -> Result<(), LexError> {
    for pair in tokens.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);

        if ends_operand(&before.kind) && starts_operand(&after.kind) {
            return Err(LexError::MissingOperator {
                before: describe(&before.kind),
                after: describe(&after.kind),
                at: (before.span.end..after.span.start).into(),
            });
        }

        if let (TokenKind::Operator(first), TokenKind::Operator(second)) = (&before.kind, &after.kind)
        {
            // `2*-(3)` is fine, the parser handles the unary minus
            if first.is_binary() && second.is_binary() && *second != Operator::Minus {
                return Err(LexError::ConsecutiveOperators {
                    first: first.symbol(),
                    second: second.symbol(),
                    at: (before.span.start..after.span.end).into(),
                });
            }
        }
    }

    Ok(())
}

fn ends_operand(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number(_) | TokenKind::Operator(Operator::CloseParen)
    )
}

fn starts_operand(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number(_) | TokenKind::Function(_) | TokenKind::Operator(Operator::OpenParen)
    )
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => n.to_string(),
        TokenKind::Operator(op) => op.symbol().to_string(),
        TokenKind::Function(name) => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        tokenize(input, &Limits::default())
            .unwrap_or_else(|e| panic!("failed to tokenize '{input}': {e}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_parse_numbers() {
        for (input, expected) in [
            ("3", 3.0),
            ("345", 345.0),
            ("3.0", 3.0),
            ("3.25", 3.25),
            (".5", 0.5),
            ("-2", -2.0),
            ("-.75", -0.75),
            ("007", 7.0),
        ] {
            assert_eq!(
                kinds(input),
                vec![TokenKind::Number(expected)],
                "when parsing '{input}'"
            );
        }

        // Invalid numbers
        for input in ["1.2.3", "5.", "3 + 4.", "-.", "."] {
            let result = tokenize(input, &Limits::default());
            assert!(
                matches!(result, Err(LexError::MalformedNumber { .. })),
                "when parsing '{input}': {result:?}"
            );
        }
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(kinds("  2 +\t3 *\n4 "), kinds("2+3*4"));
    }

    #[test]
    fn minus_context() {
        use Operator::*;

        // Binary after a number or a closing parenthesis
        assert_eq!(
            kinds("5-3"),
            vec![
                TokenKind::Number(5.0),
                TokenKind::Operator(Minus),
                TokenKind::Number(3.0),
            ]
        );
        assert_eq!(
            kinds("(1)-3"),
            vec![
                TokenKind::Operator(OpenParen),
                TokenKind::Number(1.0),
                TokenKind::Operator(CloseParen),
                TokenKind::Operator(Minus),
                TokenKind::Number(3.0),
            ]
        );

        // Part of the literal after an operator or an opening parenthesis
        assert_eq!(
            kinds("2*-3"),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Operator(Star),
                TokenKind::Number(-3.0),
            ]
        );
        assert_eq!(
            kinds("(-3)"),
            vec![
                TokenKind::Operator(OpenParen),
                TokenKind::Number(-3.0),
                TokenKind::Operator(CloseParen),
            ]
        );
        assert_eq!(
            kinds("2--3"),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Operator(Minus),
                TokenKind::Number(-3.0),
            ]
        );

        // Stays an operator when no literal follows
        assert_eq!(
            kinds("-(1)"),
            vec![
                TokenKind::Operator(Minus),
                TokenKind::Operator(OpenParen),
                TokenKind::Number(1.0),
                TokenKind::Operator(CloseParen),
            ]
        );
    }

    #[test]
    fn functions() {
        assert_eq!(
            kinds("sqrt(16)"),
            vec![
                TokenKind::Function("sqrt"),
                TokenKind::Operator(Operator::OpenParen),
                TokenKind::Number(16.0),
                TokenKind::Operator(Operator::CloseParen),
            ]
        );

        let limits = Limits::default().with_functions(false);
        assert_eq!(
            tokenize("sqrt(16)", &limits),
            Err(LexError::UnexpectedCharacter {
                character: 's',
                at: (0..1).into(),
            })
        );
    }

    #[test]
    fn unexpected_characters() {
        assert_eq!(
            tokenize("2 % 3", &Limits::default()),
            Err(LexError::UnexpectedCharacter {
                character: '%',
                at: (2..3).into(),
            })
        );
        assert_eq!(
            tokenize("1+é", &Limits::default()),
            Err(LexError::UnexpectedCharacter {
                character: 'é',
                at: (2..4).into(),
            })
        );
    }

    #[test]
    fn adjacency() {
        for input in ["2 3", "2(3)", "(1)(2)", "(1)2", "2sin(1)"] {
            let result = tokenize(input, &Limits::default());
            assert!(
                matches!(result, Err(LexError::MissingOperator { .. })),
                "when parsing '{input}': {result:?}"
            );
        }

        for input in ["2+*3", "2*/3", "2^+3", "2-*3"] {
            let result = tokenize(input, &Limits::default());
            assert!(
                matches!(result, Err(LexError::ConsecutiveOperators { .. })),
                "when parsing '{input}': {result:?}"
            );
        }

        for input in ["2*-(3)", "2 - - 3", "(1)-(2)", "-(-(1))"] {
            assert!(
                tokenize(input, &Limits::default()).is_ok(),
                "when parsing '{input}'"
            );
        }
    }

    #[test]
    fn input_length_is_capped() {
        let limits = Limits::default().with_max_input_len(5);
        assert!(tokenize("1+2+3", &limits).is_ok());
        assert_eq!(
            tokenize("1+2+34", &limits),
            Err(LexError::InputTooLong { len: 6, max: 5 })
        );
    }
}
