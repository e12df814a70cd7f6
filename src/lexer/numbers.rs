use std::fmt::Display;

use thiserror::Error;

pub(crate) struct NumberParser;

pub(crate) struct ParsedNumber {
    pub(crate) value: f64,
    pub(crate) literal_len: usize,
}

#[derive(Error, Debug)]
pub(crate) struct NumberParseError {
    pub(crate) message: &'static str,
    pub(crate) span: std::ops::Range<usize>,
}

impl Display for NumberParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl NumberParser {
    /// Parses an unsigned decimal literal (`12`, `3.5`, `.25`) from the start of `literal`.
    pub(crate) fn parse_number(literal: &[u8]) -> Result<ParsedNumber, NumberParseError> {
        let mut has_fraction = false;

        // Find the end of the number
        let mut end = literal.len();
        for (i, &c) in literal.iter().enumerate() {
            if c == b'.' {
                if has_fraction {
                    return Err(NumberParseError {
                        message: "second decimal point",
                        span: 0..i + 1,
                    });
                }
                has_fraction = true;
            } else if !c.is_ascii_digit() {
                end = i;
                break;
            }
        }

        let literal = &literal[..end];
        match literal.last() {
            Some(b'.') => {
                return Err(NumberParseError {
                    message: "expected digits after the decimal point",
                    span: 0..end,
                });
            }
            None => {
                return Err(NumberParseError {
                    message: "expected digits",
                    span: 0..1,
                });
            }
            _ => {}
        }

        let value = std::str::from_utf8(literal)
            .ok()
            .and_then(|literal| literal.parse().ok())
            .ok_or(NumberParseError {
                message: "failed to parse number literal",
                span: 0..end,
            })?;

        Ok(ParsedNumber {
            value,
            literal_len: end,
        })
    }
}
