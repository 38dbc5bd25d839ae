use crate::ast::{ASTNode, Operator};
use crate::error::EvaluationError;
use log::trace;

/// Collapses a tree to its value, either at once or one operator at a time.
pub struct Reducer;

impl Reducer {
    /// Reduces the whole tree to a single value.
    ///
    /// Recursion only descends into operands, so the stack grows with the
    /// parenthesis depth and not with the length of an operator chain.
    pub fn reduce(ast: &ASTNode) -> Result<f64, EvaluationError> {
        match ast {
            ASTNode::Number(value) => Ok(*value),
            ASTNode::Negate(inner) => Ok(-Self::reduce(inner)?),
            ASTNode::Group(inner) => Self::reduce(inner),
            ASTNode::Chain { first, rest } => {
                // Finished additive terms, and the operator that joins the
                // current term to them.
                let mut sum: Option<(f64, Operator)> = None;
                let mut term = Self::reduce(first)?;

                for (operator, node) in rest {
                    let value = Self::reduce(node)?;
                    match operator {
                        Operator::Multiply | Operator::Divide => {
                            term = operator.apply(term, value)?;
                        }
                        Operator::Add | Operator::Subtract => {
                            let total = match sum {
                                Some((total, pending)) => pending.apply(total, term)?,
                                None => term,
                            };
                            sum = Some((total, *operator));
                            term = value;
                        }
                    }
                }

                match sum {
                    Some((total, pending)) => pending.apply(total, term),
                    None => Ok(term),
                }
            }
        }
    }

    /// Performs one reduction pass: the next operator application in
    /// evaluation order is replaced by its value. A group whose content
    /// becomes a single value is replaced by that value in the same pass.
    ///
    /// Inside a chain, operands are reduced left to right first; once they
    /// are all numbers, the leftmost `*` or `/` is applied, or else the
    /// leftmost `+` or `-`.
    ///
    /// Returns `None` once the tree is a single number.
    pub fn step(ast: &ASTNode) -> Result<Option<ASTNode>, EvaluationError> {
        let reduced = match ast {
            ASTNode::Number(_) => None,
            ASTNode::Group(inner) => match inner.as_ref() {
                ASTNode::Number(value) => Some(ASTNode::Number(*value)),
                _ => Self::step(inner)?.map(|reduced| match reduced {
                    ASTNode::Number(value) => ASTNode::Number(value),
                    other => ASTNode::group(other),
                }),
            },
            ASTNode::Negate(inner) => match inner.as_ref() {
                ASTNode::Number(value) => Some(ASTNode::Number(-value)),
                _ => Self::step(inner)?.map(|reduced| match reduced {
                    ASTNode::Number(value) => ASTNode::Number(-value),
                    other => ASTNode::Negate(Box::new(other)),
                }),
            },
            ASTNode::Chain { first, rest } => Self::step_chain(first, rest)?,
        };

        Ok(reduced)
    }

    fn step_chain(
        first: &ASTNode,
        rest: &[(Operator, ASTNode)],
    ) -> Result<Option<ASTNode>, EvaluationError> {
        let operands: Option<Vec<f64>> = std::iter::once(first)
            .chain(rest.iter().map(|(_, node)| node))
            .map(ASTNode::as_number)
            .collect();

        let Some(mut values) = operands else {
            if first.as_number().is_none() {
                return Ok(Self::step(first)?.map(|reduced| ASTNode::Chain {
                    first: Box::new(reduced),
                    rest: rest.to_vec(),
                }));
            }
            let Some(index) = rest.iter().position(|(_, node)| node.as_number().is_none()) else {
                return Ok(None);
            };
            return Ok(Self::step(&rest[index].1)?.map(|reduced| {
                let mut rest = rest.to_vec();
                rest[index].1 = reduced;
                ASTNode::Chain {
                    first: Box::new(first.clone()),
                    rest,
                }
            }));
        };

        // Operand `i` sits between operators `i - 1` and `i`.
        let index = rest
            .iter()
            .position(|(operator, _)| operator.precedence() > 1)
            .unwrap_or(0);
        let Some((operator, _)) = rest.get(index) else {
            return Ok(Some(ASTNode::Number(values[0])));
        };

        values[index] = operator.apply(values[index], values[index + 1])?;
        values.remove(index + 1);
        let mut operators: Vec<Operator> = rest.iter().map(|(operator, _)| *operator).collect();
        operators.remove(index);

        let mut values = values.into_iter().map(ASTNode::Number);
        let Some(head) = values.next() else {
            return Ok(None);
        };
        Ok(Some(ASTNode::chain(head, operators.into_iter().zip(values).collect())))
    }

    /// Text of the expression after every reduction pass, starting with
    /// `ast` itself and ending with the formatted value.
    pub fn trace(ast: &ASTNode) -> Result<Vec<String>, EvaluationError> {
        let mut steps = vec![ast.to_string()];
        let mut current = ast.clone();

        while let Some(next) = Self::step(&current)? {
            trace!("Reduced '{}' to '{}'", current, next);
            steps.push(next.to_string());
            current = next;
        }

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{format_value, Parser};
    use std::thread;

    fn parse(input: &str) -> ASTNode {
        Parser::parse_expression(input).unwrap()
    }

    #[test]
    fn test_reduce_precedence() {
        assert_eq!(Reducer::reduce(&parse("2+3")), Ok(5.0));
        assert_eq!(Reducer::reduce(&parse("2+3*4")), Ok(14.0));
        assert_eq!(Reducer::reduce(&parse("(2+3)*4")), Ok(20.0));
        assert_eq!(Reducer::reduce(&parse("10-4+3")), Ok(9.0));
        assert_eq!(Reducer::reduce(&parse("10-4-3")), Ok(3.0));
        assert_eq!(Reducer::reduce(&parse("100/10/5")), Ok(2.0));
        assert_eq!(Reducer::reduce(&parse("8/2*4")), Ok(16.0));
    }

    #[test]
    fn test_reduce_negation() {
        assert_eq!(Reducer::reduce(&parse("-(2+3)")), Ok(-5.0));
        assert_eq!(Reducer::reduce(&parse("-(-(4))")), Ok(4.0));
        assert_eq!(Reducer::reduce(&parse("2--3")), Ok(5.0));
    }

    #[test]
    fn test_reduce_propagates_arithmetic_errors() {
        assert_eq!(
            Reducer::reduce(&parse("1+2/(3-3)")),
            Err(EvaluationError::DivisionByZero)
        );
        let huge = format_value(f64::MAX);
        assert_eq!(
            Reducer::reduce(&parse(&format!("{}*{}", huge, huge))),
            Err(EvaluationError::Overflow)
        );
    }

    #[test]
    fn test_reduce_mixed_chain() {
        assert_eq!(Reducer::reduce(&parse("1+2*3-4/2+5")), Ok(10.0));
        assert_eq!(Reducer::reduce(&parse("2*3*4-1")), Ok(23.0));
        assert_eq!(Reducer::reduce(&parse("1-2*3*4")), Ok(-23.0));
    }

    #[test]
    fn test_reduce_hand_built_nested_chains() {
        let sum = ASTNode::binary(ASTNode::Number(1.0), Operator::Add, ASTNode::Number(2.0));
        let product = ASTNode::binary(sum, Operator::Multiply, ASTNode::Number(3.0));
        assert_eq!(Reducer::reduce(&product), Ok(9.0));
        assert_eq!(Reducer::trace(&product).unwrap(), vec!["(1+2)*3", "3*3", "9"]);
    }

    #[test]
    fn test_long_chain_on_small_stack() {
        let input = vec!["1"; 100_000].join("+");

        let handle = thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let ast = parse(&input);
                let value = Reducer::reduce(&ast);
                let first = Reducer::step(&ast).map(|next| next.map(|node| node.operation_count()));
                (value, first)
            })
            .unwrap();

        let (value, first) = handle.join().unwrap();
        assert_eq!(value, Ok(100_000.0));
        assert_eq!(first, Ok(Some(99_998)));
    }

    #[test]
    fn test_step_order() {
        let ast = parse("2*(3+4)-6/3");
        let first = Reducer::step(&ast).unwrap().unwrap();
        assert_eq!(first.to_string(), "2*7-6/3");
        let second = Reducer::step(&first).unwrap().unwrap();
        assert_eq!(second.to_string(), "14-6/3");
        let third = Reducer::step(&second).unwrap().unwrap();
        assert_eq!(third.to_string(), "14-2");
        let fourth = Reducer::step(&third).unwrap().unwrap();
        assert_eq!(fourth.as_number(), Some(12.0));
        assert_eq!(Reducer::step(&fourth), Ok(None));
    }

    #[test]
    fn test_step_removes_one_operation() {
        let mut ast = parse("(-3.6+7.2)*(-2.5+3.3*(5.4+5.2))");
        let mut remaining = ast.operation_count();

        while let Some(next) = Reducer::step(&ast).unwrap() {
            assert_eq!(next.operation_count(), remaining - 1, "after '{}'", ast);
            remaining = next.operation_count();
            ast = next;
        }
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_trace() {
        let steps = Reducer::trace(&parse("(2+3)*4")).unwrap();
        assert_eq!(steps, vec!["(2+3)*4", "5*4", "20"]);

        let steps = Reducer::trace(&parse("-(1-3)*2")).unwrap();
        assert_eq!(steps, vec!["-(1-3)*2", "2*2", "4"]);

        let steps = Reducer::trace(&parse("5.")).unwrap();
        assert_eq!(steps, vec!["5"]);

        let steps = Reducer::trace(&parse("((7))")).unwrap();
        assert_eq!(steps, vec!["((7))", "7"]);

        let steps = Reducer::trace(&parse("1+2*3+(4+5)")).unwrap();
        assert_eq!(steps, vec!["1+2*3+(4+5)", "1+2*3+9", "1+6+9", "7+9", "16"]);
    }

    #[test]
    fn test_trace_steps_reparse_to_same_value() {
        let ast = parse("1/3+2/3*(0.1+0.2)-4.5");
        let expected = Reducer::reduce(&ast).unwrap();

        for step in Reducer::trace(&ast).unwrap() {
            let value = Reducer::reduce(&parse(&step)).unwrap();
            assert!(
                (value - expected).abs() < 1e-12,
                "step '{}' evaluates to {} instead of {}",
                step,
                value,
                expected
            );
        }
    }

    #[test]
    fn test_trace_division_by_zero() {
        let ast = ASTNode::binary(ASTNode::Number(1.0), Operator::Divide, ASTNode::Number(0.0));
        assert_eq!(Reducer::trace(&ast), Err(EvaluationError::DivisionByZero));
    }
}
