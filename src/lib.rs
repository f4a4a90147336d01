//! pg-hotswap - Zero-downtime bulk loads into live PostgreSQL tables
//!
//! A load never writes into the live table. Rows go into a staging table,
//! get deduplicated into an unlogged rebuild table behind a unique index,
//! and the rebuild table replaces the live one in a single transaction.
//!
//! Provides:
//! - Data sources (local server file, S3 object store, inline rows)
//! - Statement generation for every step of a load
//! - A fail-fast pipeline with a per-step log
//! - A PostgreSQL execution gateway
//! - TOML configuration with environment overrides

pub mod config;
pub mod database;
pub mod pipeline;
pub mod source;
pub mod statement;
pub mod table;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{ConfigError, LoadConfig};
#[cfg(feature = "postgres-backend")]
pub use database::PostgresGateway;
pub use database::{ExecutionGateway, GatewayError, GatewayResult};
pub use pipeline::{
    LoadError, LoadPipeline, LoadResult, StatementTimeout, StepName, StepOutcome, plan_load,
};
pub use source::{DataSource, InlineRowSource, LocalFileSource, ObjectStoreSource};
pub use statement::Statement;
pub use table::TableDescriptor;
pub use validation::{ValidationError, ValidationResult};
