use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Raised while turning the raw equation text into tokens.
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum LexError {
    #[error("equation is too long ({len} bytes, at most {max} allowed)")]
    #[diagnostic(code = "input_too_long")]
    InputTooLong { len: usize, max: usize },

    #[error("unexpected character '{character}' at position {}", .at.offset())]
    #[diagnostic(code = "unexpected_character")]
    UnexpectedCharacter {
        character: char,
        #[label("unexpected character")]
        at: SourceSpan,
    },

    #[error("malformed number '{literal}' at position {}", .at.offset())]
    #[diagnostic(code = "malformed_number")]
    MalformedNumber {
        literal: String,
        #[label("{reason}")]
        at: SourceSpan,
        reason: &'static str,
    },

    #[error("missing operator between '{before}' and '{after}' at position {}", .at.offset())]
    #[diagnostic(code = "missing_operator")]
    MissingOperator {
        before: String,
        after: String,
        #[label("expected an operator here")]
        at: SourceSpan,
    },

    #[error("consecutive operators '{first}{second}' at position {}", .at.offset())]
    #[diagnostic(code = "consecutive_operators")]
    ConsecutiveOperators {
        first: char,
        second: char,
        #[label("expected a number, function or '(' between these")]
        at: SourceSpan,
    },
}

/// Raised when the token sequence does not follow the expression grammar.
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} at position {}", .at.offset())]
    #[diagnostic(code = "unexpected_token")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        #[label("unexpected token")]
        at: SourceSpan,
    },

    #[error("expected {expected}, found end of input")]
    #[diagnostic(code = "unexpected_end")]
    UnexpectedEnd {
        expected: &'static str,
        #[label("input ends here")]
        at: SourceSpan,
    },

    #[error("unclosed parenthesis opened at position {}", .at.offset())]
    #[diagnostic(code = "unclosed_parenthesis")]
    UnclosedParenthesis {
        #[label("this '(' is never closed")]
        at: SourceSpan,
    },

    #[error("unmatched ')' at position {}", .at.offset())]
    #[diagnostic(code = "unmatched_parenthesis")]
    UnmatchedParenthesis {
        #[label("no matching '('")]
        at: SourceSpan,
    },

    #[error("function '{function}' must be followed by '(' at position {}", .at.offset())]
    #[diagnostic(code = "missing_parenthesis")]
    MissingParenthesis {
        function: String,
        #[label("expected '(' after the function name")]
        at: SourceSpan,
    },

    /// Tokens left over once the root expression is complete. Slices produced by
    /// [`tokenize`](crate::lexer::tokenize) reject every such case as a
    /// [`LexError`] first, so only hand-built token slices get here.
    #[error("trailing input: unexpected {found} at position {}", .at.offset())]
    #[diagnostic(code = "trailing_input")]
    TrailingInput {
        found: String,
        #[label("expression already ended")]
        at: SourceSpan,
    },

    #[error("expression too complex: nesting deeper than {max_depth} levels")]
    #[diagnostic(code = "too_complex")]
    TooComplex {
        max_depth: usize,
        #[label("limit exceeded here")]
        at: SourceSpan,
    },

    #[error("expression too long: tree taller than {max_height} levels")]
    #[diagnostic(code = "too_tall")]
    TooTall {
        max_height: usize,
        #[label("limit exceeded here")]
        at: SourceSpan,
    },
}

/// Raised while walking a parsed expression tree.
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum EvalError {
    #[error("division by zero")]
    #[diagnostic(code = "division_by_zero")]
    DivisionByZero,

    #[error("result is not a finite number ({value})")]
    #[diagnostic(code = "non_finite")]
    NonFinite { value: f64 },

    #[error("unknown function '{name}'")]
    #[diagnostic(
        code = "unknown_function",
        help("available functions: sin, cos, tan, log, sqrt, abs")
    )]
    UnknownFunction { name: String },

    #[error("expression tree nested deeper than {max_height} levels")]
    #[diagnostic(code = "too_deep")]
    TooDeep { max_height: usize },
}

/// Any failure of the tokenize → parse → evaluate pipeline.
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum SolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

impl SolveError {
    /// Every pipeline failure is caused by the equation itself, never by the host.
    pub fn status_code(&self) -> u16 {
        400
    }
}
