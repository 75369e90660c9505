use std::process;

fn main() {
    // Load a .env file if one is present; tools inherit the result.
    dotenvy::dotenv().ok();

    if let Err(e) = gantry::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
