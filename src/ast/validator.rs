use crate::error::EvaluationError;
use std::fmt;
use std::ops::Deref;

/// Normalized expression text: no whitespace, `.` as the only decimal
/// separator, balanced parentheses, no empty `()` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression(String);

impl Expression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Expression {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deepest parenthesis nesting an expression may use.
pub const MAX_NESTING_DEPTH: usize = 256;

pub struct Validator;

impl Validator {
    /// Rejects structurally invalid input and returns the normalized text.
    pub fn validate(raw: &str) -> Result<Expression, EvaluationError> {
        let mut normalized = String::with_capacity(raw.len());

        for (position, character) in raw.chars().enumerate() {
            match character {
                c if c.is_whitespace() => {}
                ',' => normalized.push('.'),
                '0'..='9' | '.' | '(' | ')' | '+' | '-' | '*' | '/' => normalized.push(character),
                _ => {
                    return Err(EvaluationError::InvalidCharacter {
                        character,
                        position,
                    })
                }
            }
        }

        Self::check_parentheses(&normalized)?;
        Ok(Expression(normalized))
    }

    fn check_parentheses(expression: &str) -> Result<(), EvaluationError> {
        // Positions of the `(` still waiting for their `)`.
        let mut open = Vec::new();

        for (position, character) in expression.char_indices() {
            match character {
                '(' => {
                    if open.len() == MAX_NESTING_DEPTH {
                        return Err(EvaluationError::NestingTooDeep {
                            position,
                            limit: MAX_NESTING_DEPTH,
                        });
                    }
                    open.push(position);
                }
                ')' => {
                    if open.pop().is_none() {
                        return Err(EvaluationError::UnbalancedParentheses { position });
                    }
                }
                _ => {}
            }
        }

        if let Some(position) = expression.find("()") {
            return Err(EvaluationError::EmptyParenthesisGroup { position });
        }

        match open.last() {
            Some(&position) => Err(EvaluationError::UnbalancedParentheses { position }),
            None => Ok(()),
        }
    }
}
