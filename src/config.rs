/// Deepest nesting of parentheses, unary minus, function calls and `^` operands
/// accepted by default.
pub const MAX_DEPTH: usize = 50;

/// Tallest expression tree accepted by default, counting every operator and
/// call between the root and the deepest literal. Each level needs at least one
/// token, so any equation within [`MAX_INPUT_LEN`] stays below it.
pub const MAX_TREE_HEIGHT: usize = 256;

/// Longest equation, in bytes, accepted by default.
pub const MAX_INPUT_LEN: usize = 200;

/// Bounds applied to a single evaluation. There is no external cancellation;
/// input length, nesting depth and tree height are the whole budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_depth: usize,
    /// Bounds both the parser's output and the evaluator's recursion.
    pub max_tree_height: usize,
    pub max_input_len: usize,
    /// When disabled, letters in the input are rejected by the lexer.
    pub allow_functions: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_tree_height: MAX_TREE_HEIGHT,
            max_input_len: MAX_INPUT_LEN,
            allow_functions: true,
        }
    }
}

impl Limits {
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    pub fn with_max_tree_height(self, max_tree_height: usize) -> Self {
        Self {
            max_tree_height,
            ..self
        }
    }

    pub fn with_max_input_len(self, max_input_len: usize) -> Self {
        Self {
            max_input_len,
            ..self
        }
    }

    pub fn with_functions(self, allow_functions: bool) -> Self {
        Self {
            allow_functions,
            ..self
        }
    }
}
