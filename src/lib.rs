use log::debug;

pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod functions;
mod helpers;
pub mod lexer;
pub mod parser;
pub mod response;
pub mod token;

pub use config::Limits;
pub use error::SolveError;

/// Evaluates `equation` with the default [`Limits`].
pub fn solve(equation: &str) -> Result<f64, SolveError> {
    solve_with(equation, &Limits::default())
}

/// Tokenizes, parses and evaluates `equation`. Nothing is shared between calls,
/// so this is safe to call from any number of threads at once.
pub fn solve_with(equation: &str, limits: &Limits) -> Result<f64, SolveError> {
    let tokens = lexer::tokenize(equation, limits)?;
    debug!("tokenized {equation:?} into {} tokens", tokens.len());

    let tree = parser::parse(&tokens, limits)?;
    debug!("parsed {equation:?} as {tree}");

    let result = evaluator::evaluate(&tree, limits)?;
    debug!("evaluated {equation:?} to {result}");

    Ok(result)
}
