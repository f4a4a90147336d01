//! PostgreSQL execution gateway
//!
//! Holds one pooled connection for the whole run so that session settings
//! carry over between statements. The pool is sized to a single connection
//! and nothing is opened until the first statement.

use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, PoolConfig, Runtime};
use tokio::sync::Mutex;
use tokio_postgres::NoTls;
use tokio_postgres::SimpleQueryMessage;
use tokio_postgres::types::ToSql;
use tracing::debug;

use super::{ExecutionGateway, GatewayError, GatewayResult};
use crate::config::DatabaseSection;
use crate::statement::Statement;

struct Session {
    pool: Option<Pool>,
    client: Option<Object>,
}

/// PostgreSQL gateway
pub struct PostgresGateway {
    /// Masked connection description for logs
    target: String,
    session: Mutex<Session>,
}

impl PostgresGateway {
    /// Create a gateway from connection settings
    ///
    /// No connection is made here; the first [`ExecutionGateway::execute`]
    /// call opens it.
    pub fn new(database: &DatabaseSection) -> GatewayResult<Self> {
        let mut config = Config::new();
        match &database.connection_string {
            Some(url) => config.url = Some(url.clone()),
            None => {
                if database.name.is_empty() {
                    return Err(GatewayError::ConfigError(
                        "Database name should be present".to_string(),
                    ));
                }
                config.host = Some(database.host.clone());
                config.port = Some(database.port);
                config.dbname = Some(database.name.clone());
                config.user = Some(database.user.clone());
                config.password = database.password.clone();
            }
        }
        config.pool = Some(PoolConfig::new(1));

        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| GatewayError::ConfigError(format!("Failed to create pool: {}", e)))?;

        Ok(Self {
            target: database.connection_string_masked(),
            session: Mutex::new(Session {
                pool: Some(pool),
                client: None,
            }),
        })
    }

    /// Masked description of the connection target
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get a column value as text
    fn get_column_value(row: &tokio_postgres::Row, idx: usize) -> Option<String> {
        if let Ok(v) = row.try_get::<_, Option<String>>(idx) {
            return v;
        }
        if let Ok(v) = row.try_get::<_, Option<i64>>(idx) {
            return v.map(|n| n.to_string());
        }
        if let Ok(v) = row.try_get::<_, Option<i32>>(idx) {
            return v.map(|n| n.to_string());
        }
        if let Ok(v) = row.try_get::<_, Option<bool>>(idx) {
            return v.map(|b| b.to_string());
        }
        if let Ok(v) = row.try_get::<_, Option<f64>>(idx) {
            return v.map(|n| n.to_string());
        }
        None
    }

    async fn run_simple(client: &Object, text: &str) -> GatewayResult<Option<String>> {
        let messages = client
            .simple_query(text)
            .await
            .map_err(|e| GatewayError::QueryFailed(e.to_string()))?;

        let scalar = messages.iter().find_map(|message| match message {
            SimpleQueryMessage::Row(row) => Some(row.try_get(0).ok().flatten().map(str::to_string)),
            _ => None,
        });
        Ok(scalar.flatten())
    }

    async fn run_bound(client: &Object, statement: &Statement) -> GatewayResult<Option<String>> {
        let params: Vec<&(dyn ToSql + Sync)> = statement
            .params
            .iter()
            .map(|s| s as &(dyn ToSql + Sync))
            .collect();

        let rows = client
            .query(statement.text.as_str(), &params)
            .await
            .map_err(|e| GatewayError::QueryFailed(e.to_string()))?;

        Ok(rows
            .first()
            .filter(|row| !row.is_empty())
            .and_then(|row| Self::get_column_value(row, 0)))
    }
}

#[async_trait]
impl ExecutionGateway for PostgresGateway {
    async fn execute(&self, statement: &Statement) -> GatewayResult<Option<String>> {
        let mut session = self.session.lock().await;

        if session.client.is_none() {
            let pool = session.pool.as_ref().ok_or(GatewayError::Released)?;
            debug!("Opening PostgreSQL connection to {}", self.target);
            let client = pool.get().await.map_err(|e| {
                GatewayError::ConnectionFailed(format!("Failed to connect to PostgreSQL: {}", e))
            })?;
            session.client = Some(client);
        }

        let client = session.client.as_ref().ok_or(GatewayError::Released)?;
        if statement.has_params() {
            Self::run_bound(client, statement).await
        } else {
            Self::run_simple(client, &statement.text).await
        }
    }

    async fn release(&self) -> GatewayResult<()> {
        let mut session = self.session.lock().await;
        drop(session.client.take());
        if let Some(pool) = session.pool.take() {
            debug!("Closing PostgreSQL connection to {}", self.target);
            pool.close();
        }
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> DatabaseSection {
        DatabaseSection {
            name: "warehouse".to_string(),
            user: "loader".to_string(),
            password: Some("secret".to_string()),
            ..DatabaseSection::default()
        }
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let gateway = PostgresGateway::new(&section()).unwrap();
        assert_eq!(gateway.backend_type(), "postgres");
        assert!(!gateway.target().contains("secret"));
    }

    #[tokio::test]
    async fn test_missing_database_name() {
        let database = DatabaseSection {
            name: String::new(),
            ..section()
        };
        assert!(matches!(
            PostgresGateway::new(&database),
            Err(GatewayError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_release_without_connection_is_idempotent() {
        let gateway = PostgresGateway::new(&section()).unwrap();
        gateway.release().await.unwrap();
        gateway.release().await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_after_release() {
        let gateway = PostgresGateway::new(&section()).unwrap();
        gateway.release().await.unwrap();
        let result = gateway.execute(&Statement::new("SELECT 1;")).await;
        assert!(matches!(result, Err(GatewayError::Released)));
    }
}
