//! Execution gateway between the load pipeline and the database
//!
//! The pipeline only needs two things from the database side: run one
//! statement and maybe get a scalar back, and release the connection when
//! the run is over. This module defines that contract; the PostgreSQL
//! implementation lives behind the `postgres-backend` feature.

use async_trait::async_trait;

use crate::statement::Statement;

#[cfg(feature = "postgres-backend")]
pub mod postgres;

#[cfg(feature = "postgres-backend")]
pub use self::postgres::PostgresGateway;

/// Error type for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Failed to connect to database
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Connection settings are unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The gateway was used after `release`
    #[error("Gateway already released")]
    Released,
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Executes statements for one load run
///
/// An implementation owns a single database session for the whole run, so
/// session settings such as `statement_timeout` apply to every later
/// statement. Calls are made one at a time, in order.
#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Execute a statement
    ///
    /// # Arguments
    /// * `statement` - Statement text and its positional parameters
    ///
    /// # Returns
    /// The first column of the first returned row as text, or `None` when
    /// the statement returned no row
    async fn execute(&self, statement: &Statement) -> GatewayResult<Option<String>>;

    /// Release the connection
    ///
    /// Idempotent, and safe to call when no connection was ever opened.
    async fn release(&self) -> GatewayResult<()>;

    /// Get the gateway type name
    fn backend_type(&self) -> &'static str;
}
