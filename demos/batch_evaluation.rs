use textcalc::evaluate_batch;

fn main() {
    pretty_env_logger::init();

    let expressions: Vec<String> = (1..=10)
        .map(|i| format!("({} + 0,5) * {} / 2", i, i))
        .collect();

    for (i, result) in evaluate_batch(&expressions).iter().enumerate() {
        println!("Result {}: {:?}", i, result);
    }
}
