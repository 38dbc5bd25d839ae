use thiserror::Error;

/// Every way an evaluation can fail.
///
/// Positions are character offsets. For `InvalidCharacter` they index the raw
/// input; every other variant indexes the normalized expression (whitespace
/// removed, `,` replaced by `.`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("empty parenthesis group at position {position}")]
    EmptyParenthesisGroup { position: usize },

    #[error("parentheses nested deeper than {limit} levels at position {position}")]
    NestingTooDeep { position: usize, limit: usize },

    #[error("{}", malformed_operand_message(.operand, .position))]
    MalformedOperand { operand: String, position: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    Overflow,
}

fn malformed_operand_message(operand: &str, position: &usize) -> String {
    if operand.is_empty() {
        format!("missing operand at position {}", position)
    } else {
        format!("malformed operand '{}' at position {}", operand, position)
    }
}

impl EvaluationError {
    /// `true` when the input itself is malformed, `false` for numeric failures.
    pub fn is_syntax(&self) -> bool {
        !matches!(
            self,
            EvaluationError::DivisionByZero | EvaluationError::Overflow
        )
    }
}
