use textcalc::ast::Evaluator;

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new();

    let expression = "(1,5 + 2,5) * 10 / 4";
    let ast = evaluator
        .parse_expression(expression)
        .expect("Failed to parse");

    println!("Tree: {:?}", ast);
    println!("Rendered: {}", ast);

    match evaluator.evaluate_ast(&ast) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
