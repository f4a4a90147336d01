//! CLI command implementations

pub mod plan;
pub mod run;

use std::path::Path;

use crate::cli::error::CliError;
use crate::config::LoadConfig;

/// Load a job configuration and apply command-line overrides
///
/// Overrides win over both the file and the environment.
pub fn load_job_config(
    path: &Path,
    table: Option<&str>,
    statement_timeout: Option<&str>,
) -> Result<LoadConfig, CliError> {
    let mut config = LoadConfig::load(path)?;

    if let Some(table) = table {
        config.table.name = table.to_string();
    }

    if let Some(timeout) = statement_timeout {
        config.load.statement_timeout = timeout.parse().map_err(|e: String| {
            CliError::InvalidArgument(format!("--statement-timeout: {}", e))
        })?;
    }

    Ok(config)
}
