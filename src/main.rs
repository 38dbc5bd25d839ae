use log::{debug, info, warn};
use std::env;
use textcalc::{evaluate, format_value, EvaluationError};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::task::{self, JoinError};

const GENERIC_ERROR: &str = "Please make sure your equation is correct";
const MAX_LEN_VAR: &str = "TEXTCALC_MAX_LEN";

/// Evaluates the equation given as arguments, or one equation per line of
/// stdin when there are none.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let max_len = max_input_length();
    let args: Vec<String> = env::args().skip(1).collect();

    if !args.is_empty() {
        println!("{}", respond(args.join(" "), max_len).await?);
        return Ok(());
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let equation = line.trim();
        if equation.is_empty() {
            continue;
        }
        println!("{}", respond(equation.to_string(), max_len).await?);
    }

    Ok(())
}

/// Runs the evaluation on the blocking pool so the reading task stays free.
async fn respond(equation: String, max_len: Option<usize>) -> Result<String, JoinError> {
    if let Some(limit) = max_len {
        let length = equation.chars().count();
        if length > limit {
            debug!("Rejected equation of {} characters (limit {})", length, limit);
            return Ok(GENERIC_ERROR.to_string());
        }
    }

    let (equation, result) = task::spawn_blocking(move || {
        let result = evaluate(&equation);
        (equation, result)
    })
    .await?;

    Ok(message(&equation, result))
}

fn message(equation: &str, result: Result<f64, EvaluationError>) -> String {
    match result {
        Ok(value) => format!("The result of {} is {}", equation, format_value(value)),
        Err(error) => {
            // Syntax mistakes are routine; numeric failures are worth seeing
            // at the default verbosity.
            if error.is_syntax() {
                debug!("'{}' {}: {}", equation, describe_rejection(&error), error);
            } else {
                info!("'{}' {}: {}", equation, describe_rejection(&error), error);
            }
            GENERIC_ERROR.to_string()
        }
    }
}

fn describe_rejection(error: &EvaluationError) -> &'static str {
    if error.is_syntax() {
        "is not a valid equation"
    } else {
        "has no finite result"
    }
}

fn max_input_length() -> Option<usize> {
    let value = env::var(MAX_LEN_VAR).ok()?;
    match value.parse() {
        Ok(limit) => Some(limit),
        Err(_) => {
            warn!("Ignoring {}={}: not a character count", MAX_LEN_VAR, value);
            None
        }
    }
}
