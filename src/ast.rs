use std::fmt::{self, Display, Write};

/// An expression tree. Every node owns its children; nothing is shared.
#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Literal(f64),
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    UnaryNegate(Box<Node>),
    Call {
        function: String,
        argument: Box<Node>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Sub => '-',
            BinaryOperator::Mul => '*',
            BinaryOperator::Div => '/',
            BinaryOperator::Pow => '^',
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

impl Node {
    pub fn binary(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Node::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn negate(operand: Node) -> Self {
        Node::UnaryNegate(Box::new(operand))
    }

    pub fn call(function: impl Into<String>, argument: Node) -> Self {
        Node::Call {
            function: function.into(),
            argument: Box::new(argument),
        }
    }

    /// Number of edges on the longest path from this node down to a literal.
    pub fn height(&self) -> usize {
        match self {
            Node::Literal(_) => 0,
            Node::BinaryOp { lhs, rhs, .. } => 1 + lhs.height().max(rhs.height()),
            Node::UnaryNegate(operand) => 1 + operand.height(),
            Node::Call { argument, .. } => 1 + argument.height(),
        }
    }

    /// Renders the tree in reverse Polish notation, e.g. `2 3 4 * +`. Negation is
    /// written as `neg` so it can't be confused with subtraction.
    pub fn to_postfix(&self) -> String {
        let mut out = Vec::new();
        self.collect_postfix(&mut out);
        out.join(" ")
    }

    fn collect_postfix(&self, out: &mut Vec<String>) {
        match self {
            Node::Literal(value) => out.push(value.to_string()),
            Node::BinaryOp { op, lhs, rhs } => {
                lhs.collect_postfix(out);
                rhs.collect_postfix(out);
                out.push(op.to_string());
            }
            Node::UnaryNegate(operand) => {
                operand.collect_postfix(out);
                out.push("neg".to_string());
            }
            Node::Call { function, argument } => {
                argument.collect_postfix(out);
                out.push(function.clone());
            }
        }
    }
}

/// Fully parenthesised infix form.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(value) if value.is_sign_negative() => write!(f, "({value})"),
            Node::Literal(value) => write!(f, "{value}"),
            Node::BinaryOp { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Node::UnaryNegate(operand) => write!(f, "-{operand}"),
            Node::Call { function, argument } => write!(f, "{function}({argument})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        // -(2 + 3 * sqrt(16))
        Node::negate(Node::binary(
            BinaryOperator::Add,
            Node::Literal(2.0),
            Node::binary(
                BinaryOperator::Mul,
                Node::Literal(3.0),
                Node::call("sqrt", Node::Literal(16.0)),
            ),
        ))
    }

    #[test]
    fn postfix() {
        assert_eq!(sample().to_postfix(), "2 3 16 sqrt * + neg");
        assert_eq!(Node::Literal(-1.5).to_postfix(), "-1.5");
    }

    #[test]
    fn height() {
        assert_eq!(Node::Literal(1.0).height(), 0);
        assert_eq!(sample().height(), 4);
    }

    #[test]
    fn infix() {
        assert_eq!(sample().to_string(), "-(2 + (3 * sqrt(16)))");
        assert_eq!(
            Node::binary(BinaryOperator::Pow, Node::Literal(-2.0), Node::Literal(2.0)).to_string(),
            "((-2) ^ 2)"
        );
    }
}
