use crate::ast::{ASTNode, Operator};
use crate::error::EvaluationError;
use log::debug;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "ast/expression.pest"]
pub struct ExpressionParser;

impl ExpressionParser {
    /// Builds the tree for an already normalized expression.
    pub fn parse_expression(input: &str) -> Result<ASTNode, EvaluationError> {
        debug!("Parsing expression: {}", input);
        let parse_result = ExpressionParser::parse(Rule::expression, input)
            .map_err(|e| syntax_error(input, &e))?
            .next()
            .ok_or_else(|| missing_operand(0))?;

        let mut pairs = parse_result.into_inner();
        let ast = Self::build_chain(next_pair(&mut pairs, 0)?)?;
        debug!("Built tree: {:?}", ast);
        Ok(ast)
    }

    fn build_chain(pair: Pair<Rule>) -> Result<ASTNode, EvaluationError> {
        let position = pair.as_span().start();
        let mut pairs = pair.into_inner();
        let first = Self::build_factor(next_pair(&mut pairs, position)?)?;
        let mut rest = Vec::new();

        while let Some(operator_pair) = pairs.next() {
            let operator = build_operator(&operator_pair)?;
            let operand = Self::build_factor(next_pair(&mut pairs, operator_pair.as_span().end())?)?;
            rest.push((operator, operand));
        }

        Ok(ASTNode::chain(first, rest))
    }

    fn build_factor(pair: Pair<Rule>) -> Result<ASTNode, EvaluationError> {
        let position = pair.as_span().start();
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs, position)?;

        if first.as_rule() != Rule::NEG {
            return Self::build_primary(first);
        }

        // A sign in front of a literal belongs to the literal.
        let primary = next_pair(&mut pairs, first.as_span().end())?;
        match primary.as_rule() {
            Rule::number => Ok(ASTNode::Number(-build_number(&primary)?)),
            _ => Ok(ASTNode::Negate(Box::new(Self::build_primary(primary)?))),
        }
    }

    fn build_primary(pair: Pair<Rule>) -> Result<ASTNode, EvaluationError> {
        match pair.as_rule() {
            Rule::number => Ok(ASTNode::Number(build_number(&pair)?)),
            Rule::group => {
                let position = pair.as_span().start() + 1;
                let mut pairs = pair.into_inner();
                let inner = Self::build_chain(next_pair(&mut pairs, position)?)?;
                Ok(ASTNode::group(inner))
            }
            _ => Err(unexpected(&pair)),
        }
    }
}

fn build_operator(pair: &Pair<Rule>) -> Result<Operator, EvaluationError> {
    Operator::try_from(pair.as_str()).map_err(|_| unexpected(pair))
}

fn build_number(pair: &Pair<Rule>) -> Result<f64, EvaluationError> {
    let value = pair.as_str().parse::<f64>().map_err(|_| unexpected(pair))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::Overflow)
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, position: usize) -> Result<Pair<'i, Rule>, EvaluationError> {
    pairs.next().ok_or_else(|| missing_operand(position))
}

fn unexpected(pair: &Pair<Rule>) -> EvaluationError {
    EvaluationError::MalformedOperand {
        operand: pair.as_str().to_string(),
        position: pair.as_span().start(),
    }
}

fn missing_operand(position: usize) -> EvaluationError {
    EvaluationError::MalformedOperand {
        operand: String::new(),
        position,
    }
}

/// Reports a grammar failure as the operand found where it stopped (empty
/// when there is none, e.g. `2*` or `2++3`).
fn syntax_error(input: &str, error: &pest::error::Error<Rule>) -> EvaluationError {
    let position = match error.location {
        InputLocation::Pos(position) => position,
        InputLocation::Span((start, _)) => start,
    };
    debug!("Parse error: {}", error);

    let operand = input
        .get(position..)
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    EvaluationError::MalformedOperand { operand, position }
}
