// blobflow - Azure Blob Storage exercise

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::sync::Arc;

use blobflow::{account_override_from_env, init_logging, BlobWorkflow, Console, StdoutConsole};
use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration and set up logging
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.log)?;

    let backend = config
        .backend
        .build()
        .context("Failed to set up storage backend")?;

    let console: Arc<dyn Console> = Arc::new(StdoutConsole);
    let workflow = BlobWorkflow::new(
        config.workflow.clone(),
        backend.credentials,
        backend.connector,
        console.clone(),
    )?;

    console.write_line("Azure Blob Storage exercise\n");

    let account_override = account_override_from_env(&config.workflow.account_env);
    let report = workflow.run(account_override).await?;
    tracing::info!(
        container = %report.container_name,
        blobs = report.listed_blobs.len(),
        "workflow finished"
    );

    if !cli.no_pause {
        console.write_line("\nPress enter to exit the sample application.");
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
    }

    Ok(())
}
