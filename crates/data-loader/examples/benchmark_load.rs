use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/programs.csv");

    println!("Loading program catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(path).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Programs: {}", catalog.len());
    println!(
        "\nPerformance: {:.0} programs/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );
}
