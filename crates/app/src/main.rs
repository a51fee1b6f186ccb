//! Docforge - Main Entry Point
//!
//! Tests the templates of one project and prints the outcomes as JSON.

use clap::Parser;
use docforge::Cli;
use docforge_infrastructure::{Settings, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    tracing::info!(
        backend = %settings.backend_url,
        "Starting docforge v{}",
        env!("CARGO_PKG_VERSION")
    );

    let report = docforge::run(&cli, &settings).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
