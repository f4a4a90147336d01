//! `run` command: execute a load against the configured database

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::load_job_config;
use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_load_result};
use crate::database::PostgresGateway;
use crate::pipeline::{LoadPipeline, StepName};

/// Run command arguments
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Job configuration file
    pub config: PathBuf,
    /// Override of the live table name
    pub table: Option<String>,
    /// Override of the statement timeout
    pub statement_timeout: Option<String>,
    /// Output format
    pub format: OutputFormat,
}

/// Execute a load and print its step log
pub fn handle_run(args: &RunArgs) -> Result<(), CliError> {
    let config = load_job_config(
        &args.config,
        args.table.as_deref(),
        args.statement_timeout.as_deref(),
    )?;

    let table = config.table_descriptor();
    let source = config.data_source()?;
    info!(
        "Loading into {} on {}",
        table.name,
        config.database.connection_string_masked()
    );
    let gateway = Arc::new(PostgresGateway::new(&config.database)?);

    let pipeline = LoadPipeline::new(table, source, gateway)
        .with_statement_timeout(config.load.statement_timeout);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::IoError(format!("Failed to create runtime: {}", e)))?;
    let result = rt.block_on(pipeline.run());

    println!("{}", format_load_result(&result, args.format));

    if result.is_success() {
        Ok(())
    } else {
        Err(CliError::LoadFailed {
            table: result.table.clone(),
            step: result.failed_step().unwrap_or(StepName::Reset),
        })
    }
}
