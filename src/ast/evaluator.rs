use crate::ast::{ASTNode, Expression, Parser, Reducer, Validator};
use crate::error::EvaluationError;
use log::debug;

/// Stateless entry point chaining validation, parsing and reduction.
///
/// Holds no data, so one value can be shared freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Checks the characters and parentheses of `raw` and normalizes it.
    pub fn validate(&self, raw: &str) -> Result<Expression, EvaluationError> {
        Validator::validate(raw)
    }

    /// Parse an expression string into an AST.
    pub fn parse_expression(&self, raw: &str) -> Result<ASTNode, EvaluationError> {
        let expression = self.validate(raw)?;
        Parser::parse_expression(&expression)
    }

    /// Evaluates an expression string.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` with a finite value if the evaluation succeeds.
    /// * `Err(EvaluationError)` describing the first problem found otherwise.
    pub fn evaluate_expression(&self, raw: &str) -> Result<f64, EvaluationError> {
        let result = self
            .parse_expression(raw)
            .and_then(|ast| self.evaluate_ast(&ast));

        if let Err(error) = &result {
            debug!("Evaluation of '{}' failed: {}", raw, error);
        }
        result
    }

    /// Evaluate a pre-parsed AST.
    pub fn evaluate_ast(&self, ast: &ASTNode) -> Result<f64, EvaluationError> {
        Reducer::reduce(ast)
    }

    /// Every intermediate form of `raw`, one per reduction pass, starting with
    /// the normalized input and ending with the result.
    pub fn trace(&self, raw: &str) -> Result<Vec<String>, EvaluationError> {
        let expression = self.validate(raw)?;
        let ast = Parser::parse_expression(&expression)?;
        let mut steps = Reducer::trace(&ast)?;

        if steps.first().map(String::as_str) != Some(expression.as_str()) {
            steps.insert(0, expression.into_inner());
        }
        Ok(steps)
    }
}
