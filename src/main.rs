// CLI binary entry point for opuscaf

mod cli;

use clap::Parser;
use std::process;

use cli::Config;

fn main() {
    let config = Config::parse();
    init_tracing(config.log_level());

    if let Err(e) = cli::run(&config) {
        eprintln!("✗ {:#}", e);
        process::exit(1);
    }
}

/// Install the global subscriber. RUST_LOG wins over the command-line level;
/// logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
