//! `plan` command: print the statements a load would send

use std::path::PathBuf;

use super::load_job_config;
use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_plan};
use crate::pipeline::plan_load;

/// Plan command arguments
#[derive(Debug, Clone)]
pub struct PlanArgs {
    /// Job configuration file
    pub config: PathBuf,
    /// Override of the live table name
    pub table: Option<String>,
    /// Output format
    pub format: OutputFormat,
}

/// Validate the job and print its statements without connecting
pub fn handle_plan(args: &PlanArgs) -> Result<(), CliError> {
    let config = load_job_config(&args.config, args.table.as_deref(), None)?;

    let table = config.table_descriptor();
    let source = config.data_source()?;
    table.validate()?;
    source.validate()?;
    table.validate_source_columns(&source)?;

    let plan = plan_load(&table, &source, config.load.statement_timeout);
    println!("{}", format_plan(&plan, args.format));
    Ok(())
}
