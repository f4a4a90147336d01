//! CLI-specific error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::database::GatewayError;
use crate::pipeline::StepName;
use crate::validation::ValidationError;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Load into {table} failed at step {step}")]
    LoadFailed { table: String, step: StepName },
}
