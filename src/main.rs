use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use storage_selector::{StorageBootstrap, StorageProperties};

#[derive(Debug, Parser)]
#[command(name = "storage-selector")]
#[command(about = "Resolve log, state and document storage from configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON property file; the environment fills in keys it does not set.
    #[arg(value_name = "FILE")]
    properties: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Storage bootstrap failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let props = match cli.properties {
        Some(path) => StorageProperties::from_json_file(path)?.with_env()?,
        None => StorageProperties::from_env()?,
    };

    let bootstrap = StorageBootstrap::from_properties(&props)?;

    println!("environment:    {}", bootstrap.environment());
    println!("log storage:    {:?}", bootstrap.log_storage());
    match bootstrap.state_storage() {
        Some(state) => println!("state storage:  {:?}", state),
        None => println!("state storage:  none"),
    }
    println!(
        "document store: {} at {}",
        bootstrap.document_store_kind(),
        bootstrap.document_store_ref().location("")
    );

    Ok(())
}
