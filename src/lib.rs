pub mod ast;
pub mod error;

use ast::Evaluator;
use rayon::prelude::*;

pub use ast::format_value;
pub use error::EvaluationError;

/// Evaluates an arithmetic expression such as `(2 + 3) * 4,5`.
///
/// Accepts digits, `.` or `,` as decimal separator, `+ - * /`, parentheses
/// and whitespace. `*` and `/` bind tighter than `+` and `-`; operators of
/// the same tier associate to the left. Dividing by zero, or producing a
/// value too large for an `f64`, is an error rather than an infinity.
pub fn evaluate(input: &str) -> Result<f64, EvaluationError> {
    Evaluator::new().evaluate_expression(input)
}

/// Evaluates independent expressions in parallel. Results keep input order.
pub fn evaluate_batch<S>(inputs: &[S]) -> Vec<Result<f64, EvaluationError>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|input| evaluate(input.as_ref()))
        .collect()
}
