use crate::error::EvaluationError;
use std::fmt;

mod evaluator;
mod parser;
mod reducer;
mod validator;

pub use evaluator::Evaluator;
pub use parser::ExpressionParser as Parser;
pub use reducer::Reducer;
pub use validator::{Expression, Validator, MAX_NESTING_DEPTH};

/// Expression tree.
///
/// Operator sequences are kept flat in `Chain` rather than nested one node
/// per operator, so a long run like `1+1+...+1` costs one `Vec`, not one
/// level of recursion per term. Tree depth grows only with parentheses.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Negate(Box<ASTNode>),
    /// `first op1 x1 op2 x2 ...`, evaluated with `*`/`/` before `+`/`-`,
    /// left to right within each tier.
    Chain {
        first: Box<ASTNode>,
        rest: Vec<(Operator, ASTNode)>,
    },
    Group(Box<ASTNode>),
}

impl ASTNode {
    /// Builds a chain, or returns `first` alone when there are no operators.
    pub fn chain(first: ASTNode, rest: Vec<(Operator, ASTNode)>) -> Self {
        if rest.is_empty() {
            first
        } else {
            ASTNode::Chain {
                first: Box::new(first),
                rest,
            }
        }
    }

    pub fn binary(left: ASTNode, operator: Operator, right: ASTNode) -> Self {
        ASTNode::chain(left, vec![(operator, right)])
    }

    pub fn group(inner: ASTNode) -> Self {
        ASTNode::Group(Box::new(inner))
    }

    pub fn as_number(&self) -> Option<f64> {
        if let ASTNode::Number(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Number of operator applications left before the tree collapses to a value.
    pub fn operation_count(&self) -> usize {
        match self {
            ASTNode::Number(_) => 0,
            ASTNode::Negate(inner) | ASTNode::Group(inner) => inner.operation_count(),
            ASTNode::Chain { first, rest } => {
                first.operation_count()
                    + rest
                        .iter()
                        .map(|(_, node)| 1 + node.operation_count())
                        .sum::<usize>()
            }
        }
    }
}

/// Renders the node in the same syntax the parser accepts, so any
/// intermediate tree can be fed back through `evaluate`.
impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTNode::Number(value) => write!(f, "{}", format_value(*value)),
            ASTNode::Negate(inner) => match inner.as_ref() {
                ASTNode::Number(value) if !value.is_sign_negative() => write!(f, "-{}", inner),
                ASTNode::Group(_) => write!(f, "-{}", inner),
                _ => write!(f, "-({})", inner),
            },
            ASTNode::Group(inner) => write!(f, "({})", inner),
            ASTNode::Chain { first, rest } => {
                write_operand(f, first)?;
                for (operator, node) in rest {
                    write!(f, "{}", operator.symbol())?;
                    write_operand(f, node)?;
                }
                Ok(())
            }
        }
    }
}

// A chain nested inside a chain only comes from hand-built trees; it keeps
// its own grouping.
fn write_operand(f: &mut fmt::Formatter<'_>, node: &ASTNode) -> fmt::Result {
    match node {
        ASTNode::Chain { .. } => write!(f, "({})", node),
        _ => write!(f, "{}", node),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Applies the operator to two operands.
    ///
    /// A zero divisor is reported as `DivisionByZero` (this includes `0/0`);
    /// any other result that is not finite is reported as `Overflow`.
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, EvaluationError> {
        let value = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    return Err(EvaluationError::DivisionByZero);
                }
                left / right
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::Overflow)
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

/// Formats a value as plain decimal text that parses back to the same `f64`.
///
/// Never uses exponent notation, which the grammar does not accept.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}
