use notlab_rs::Equation;
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let equation = Equation::new("3^2 + 1 + max(sin(x1), 2) * 10").expect("Failed to parse");
    println!("Equation: {}", equation);
    println!("Variables: {:?}", equation.variables());

    let context = HashMap::from([("x1".to_string(), 3.0)]);
    match equation.evaluate(&context) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    match Equation::new("2 + * 3") {
        Ok(_) => println!("Unexpectedly parsed"),
        Err(err) => println!("Error: {}", err),
    }
}
