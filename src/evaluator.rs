use log::trace;

use crate::ast::{BinaryOperator, Node};
use crate::config::Limits;
use crate::error::EvalError;
use crate::functions;

/// Walks `node` and returns its value, which is guaranteed to be finite.
///
/// Trees taller than [`Limits::max_tree_height`] are rejected before the stack
/// runs out. The parser already enforces the same bound, so this only trips for
/// hand-built trees.
pub fn evaluate(node: &Node, limits: &Limits) -> Result<f64, EvalError> {
    let value = Evaluator {
        depth: 0,
        max_height: limits.max_tree_height,
    }
    .eval(node)?;

    trace!("evaluated to {value}");
    if !value.is_finite() {
        return Err(EvalError::NonFinite { value });
    }

    Ok(value)
}

struct Evaluator {
    depth: usize,
    max_height: usize,
}

impl Evaluator {
    fn eval(&mut self, node: &Node) -> Result<f64, EvalError> {
        let value = match node {
            Node::Literal(value) => *value,
            Node::UnaryNegate(operand) => -self.eval_child(operand)?,
            Node::BinaryOp { op, lhs, rhs } => {
                // Both sides are always evaluated, left first
                let lhs = self.eval_child(lhs)?;
                let rhs = self.eval_child(rhs)?;

                match op {
                    BinaryOperator::Add => lhs + rhs,
                    BinaryOperator::Sub => lhs - rhs,
                    BinaryOperator::Mul => lhs * rhs,
                    BinaryOperator::Div => {
                        if rhs == 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        lhs / rhs
                    }
                    BinaryOperator::Pow => lhs.powf(rhs),
                }
            }
            Node::Call { function, argument } => {
                let f = functions::lookup(function).ok_or_else(|| EvalError::UnknownFunction {
                    name: function.clone(),
                })?;
                f(self.eval_child(argument)?)
            }
        };

        Ok(value)
    }

    // One level per edge of the tree, matching `Node::height`.
    fn eval_child(&mut self, node: &Node) -> Result<f64, EvalError> {
        self.depth += 1;
        if self.depth > self.max_height {
            return Err(EvalError::TooDeep {
                max_height: self.max_height,
            });
        }

        let value = self.eval(node)?;
        self.depth -= 1;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator::*;

    fn eval(node: Node) -> Result<f64, EvalError> {
        evaluate(&node, &Limits::default())
    }

    #[test]
    fn arithmetic() {
        let lit = Node::Literal;
        assert_eq!(eval(Node::binary(Add, lit(2.0), lit(3.0))), Ok(5.0));
        assert_eq!(eval(Node::binary(Sub, lit(2.0), lit(3.0))), Ok(-1.0));
        assert_eq!(eval(Node::binary(Mul, lit(2.0), lit(3.0))), Ok(6.0));
        assert_eq!(eval(Node::binary(Div, lit(3.0), lit(2.0))), Ok(1.5));
        assert_eq!(eval(Node::binary(Pow, lit(2.0), lit(10.0))), Ok(1024.0));
        assert_eq!(eval(Node::negate(lit(2.0))), Ok(-2.0));
    }

    #[test]
    fn division_by_zero() {
        for zero in [0.0, -0.0] {
            assert_eq!(
                eval(Node::binary(Div, Node::Literal(5.0), Node::Literal(zero))),
                Err(EvalError::DivisionByZero)
            );
        }
    }

    #[test]
    fn non_finite_results() {
        // Negative base with a fractional exponent
        let result = eval(Node::binary(Pow, Node::Literal(-8.0), Node::Literal(0.5)));
        assert!(matches!(result, Err(EvalError::NonFinite { value }) if value.is_nan()));

        let result = eval(Node::binary(Pow, Node::Literal(10.0), Node::Literal(400.0)));
        assert_eq!(
            result,
            Err(EvalError::NonFinite {
                value: f64::INFINITY
            })
        );

        let result = eval(Node::call("log", Node::Literal(0.0)));
        assert_eq!(
            result,
            Err(EvalError::NonFinite {
                value: f64::NEG_INFINITY
            })
        );
    }

    #[test]
    fn function_calls() {
        assert_eq!(eval(Node::call("sqrt", Node::Literal(16.0))), Ok(4.0));
        assert_eq!(eval(Node::call("ABS", Node::Literal(-3.0))), Ok(3.0));
        assert_eq!(eval(Node::call("sin", Node::Literal(0.0))), Ok(0.0));
        assert_eq!(
            eval(Node::call("exp", Node::Literal(1.0))),
            Err(EvalError::UnknownFunction {
                name: "exp".to_string()
            })
        );
    }

    #[test]
    fn depth_is_capped() {
        let mut node = Node::Literal(2.0);
        for _ in 0..10 {
            node = Node::call("abs", node);
        }

        let limits = Limits::default().with_max_tree_height(10);
        assert_eq!(evaluate(&node, &limits), Ok(2.0));

        let limits = Limits::default().with_max_tree_height(9);
        assert_eq!(
            evaluate(&node, &limits),
            Err(EvalError::TooDeep { max_height: 9 })
        );
    }

    #[test]
    fn long_chains_are_capped() {
        // 1 + 1 + ... + 1, left-deep, built without the parser
        let mut node = Node::Literal(1.0);
        for _ in 0..300 {
            node = Node::binary(Add, node, Node::Literal(1.0));
        }

        assert_eq!(eval(node.clone()), Err(EvalError::TooDeep { max_height: 256 }));

        let limits = Limits::default().with_max_tree_height(300);
        assert_eq!(evaluate(&node, &limits), Ok(301.0));
    }
}
