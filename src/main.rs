mod cli;

use std::process;

use tracing_subscriber::EnvFilter;

use tourguide::Config;

/// Env var holding the log filter, e.g. `TOURGUIDE_LOG=tourguide=debug`.
const LOG_ENV: &str = "TOURGUIDE_LOG";

fn main() {
    init_tracing();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
