//! Platter CLI

use std::process;

use platter_app::observability;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = cli::Cli::load();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
