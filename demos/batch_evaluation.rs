use notlab_rs::{EquationCache, EvalConfig};

fn main() {
    pretty_env_logger::init();

    let config = EvalConfig::default().with_parallel_threshold(1024);
    let mut cache = EquationCache::with_config(16, config);
    let samples: Vec<f64> = (0..10_000).map(|i| i as f64 / 1000.0).collect();

    for expression in ["x^2 + 3*x - 5", "max(sin(t), 0) * 10", "x^2 + 3*x - 5"] {
        let equation = cache.get_or_parse(expression).unwrap();
        let results = equation.eval_batch(&samples).unwrap();
        println!(
            "{}: {} results, first {:?}, last {:?}",
            equation,
            results.len(),
            results.first(),
            results.last()
        );
    }

    println!("Cached equations: {}", cache.len());

    let equation = cache.get_or_parse("1 / x").unwrap();
    if let Err(err) = equation.eval_batch(&samples) {
        println!("Error: {}", err);
    }
}
