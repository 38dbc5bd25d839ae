use textcalc::ast::Evaluator;

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new();
    let expressions = [
        "2 + 3 * 4",
        "(2 + 3) * 4",
        "(-3,6 + 7,2) * (-2,5 + 3,3 * (5,4 + 5,2))",
        "10 / (5 - 5)",
        "2 ++ 3",
    ];

    for expression in expressions {
        match evaluator.evaluate_expression(expression) {
            Ok(result) => println!("{} = {}", expression, result),
            Err(err) => println!("{} -> error: {}", expression, err),
        }
    }

    match evaluator.trace("(1 + 2) * 3 - 4 / 2") {
        Ok(steps) => println!("Reduction: {}", steps.join(" => ")),
        Err(err) => println!("Error: {}", err),
    }
}
