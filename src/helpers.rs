use crate::{ast::BinaryOperator, token::Operator};

impl BinaryOperator {
    pub(crate) fn from(op: Operator) -> Self {
        match op {
            Operator::Plus => Self::Add,
            Operator::Minus => Self::Sub,
            Operator::Star => Self::Mul,
            Operator::Slash => Self::Div,
            Operator::Caret => Self::Pow,

            Operator::OpenParen | Operator::CloseParen => unreachable!(),
        }
    }
}

impl Operator {
    // For easier matching
    pub(crate) fn is_binary(self) -> bool {
        !matches!(self, Operator::OpenParen | Operator::CloseParen)
    }
}
