use notlab_rs::Equation;

fn main() {
    pretty_env_logger::init();

    let equation = Equation::new("price * volume - max(cost, 100)").unwrap();
    println!("Columns: {:?}", equation.variables());

    let rows = vec![[120.0, 30.0, 50.0], [80.0, 60.0, 400.0], [10.0, 2.0, 0.0]];
    for (i, result) in equation.eval_table(&rows).unwrap().iter().enumerate() {
        println!("Row {}: {}", i, result);
    }

    let ragged = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
    match equation.eval_table(&ragged) {
        Ok(results) => println!("Results: {:?}", results),
        Err(err) => println!("Error: {}", err),
    }
}
