//! Fail-fast load pipeline
//!
//! A run walks [`StepName::ALL`] in order. Each step is timed and logged;
//! the first failing step records its error and every later step is skipped
//! without being logged or sent to the database. The live table is only
//! touched by the last step, so a failed run leaves it as it was.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pg_hotswap::{LoadPipeline, PostgresGateway, StatementTimeout, TableDescriptor};
//! use pg_hotswap::source::ObjectStoreSource;
//!
//! let table = TableDescriptor::new(
//!     "users",
//!     vec!["name::text".into(), "email::text".into()],
//!     vec!["email".into()],
//! );
//! let source = ObjectStoreSource::new("us-east-2", "mybucket", "/users.csv");
//! let gateway = Arc::new(PostgresGateway::new(&config.database)?);
//!
//! let result = LoadPipeline::new(table, source.into(), gateway)
//!     .with_statement_timeout("30min".parse()?)
//!     .run()
//!     .await;
//! println!("success: {}, loaded: {:?}", result.is_success(), result.rows_loaded);
//! ```

mod result;
mod step;
mod timeout;

pub use result::{LoadError, LoadResult};
pub use step::{StepName, StepOutcome};
pub use timeout::StatementTimeout;

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use crate::database::ExecutionGateway;
use crate::source::DataSource;
use crate::statement::Statement;
use crate::table::TableDescriptor;

/// One load of a data source into a live table
///
/// Built once per invocation; [`LoadPipeline::run`] consumes it.
pub struct LoadPipeline {
    table: TableDescriptor,
    source: DataSource,
    gateway: Arc<dyn ExecutionGateway>,
    statement_timeout: StatementTimeout,
}

impl LoadPipeline {
    pub fn new(
        table: TableDescriptor,
        source: DataSource,
        gateway: Arc<dyn ExecutionGateway>,
    ) -> Self {
        Self {
            table,
            source,
            gateway,
            statement_timeout: StatementTimeout::NoTimeout,
        }
    }

    /// Set the session statement timeout
    pub fn with_statement_timeout(mut self, timeout: StatementTimeout) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Statements each step would send, without running anything
    pub fn plan(&self) -> Vec<(StepName, Vec<Statement>)> {
        plan_load(&self.table, &self.source, self.statement_timeout)
    }

    /// Run every step, release the gateway and return the result
    pub async fn run(self) -> LoadResult {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("load", table = %self.table.name, run_id = %run_id);
        self.run_steps(run_id).instrument(span).await
    }

    async fn run_steps(self, run_id: Uuid) -> LoadResult {
        info!(
            "Starting load of {} source into {} via {}",
            self.source.kind(),
            self.table.name,
            self.gateway.backend_type()
        );

        let mut result = LoadResult::new(run_id, self.table.name.clone());
        for step in StepName::ALL {
            if result.failed_step().is_some() {
                continue;
            }

            let started = Instant::now();
            let outcome = self.run_step(step).await;
            let duration_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

            match &outcome {
                Ok(_) => info!("Step {} succeeded in {}us", step, duration_micros),
                Err(e) => warn!("Step {} failed after {}us: {}", step, duration_micros, e),
            }
            result = result.record(step, duration_micros, outcome);
        }

        if let Err(e) = self.gateway.release().await {
            warn!("Failed to release {} gateway: {}", self.gateway.backend_type(), e);
        }

        let result = result.finish();
        if result.is_success() {
            info!(
                "Load into {} finished, rows loaded: {}",
                self.table.name,
                result.rows_loaded.as_deref().unwrap_or("unknown")
            );
        } else {
            warn!(
                "Load into {} failed with {} error(s), live table untouched",
                self.table.name,
                result.errors.len()
            );
        }
        result
    }

    async fn run_step(&self, step: StepName) -> Result<Option<String>, LoadError> {
        if step == StepName::ValidateSource {
            self.table.validate()?;
            self.source.validate()?;
            self.table.validate_source_columns(&self.source)?;
            return Ok(None);
        }

        let statements = self.statements_for(step);
        if statements.is_empty() {
            debug!("Step {} has nothing to execute", step);
        }

        let mut scalar = None;
        for statement in &statements {
            debug!("Executing: {}", statement);
            scalar = self
                .gateway
                .execute(statement)
                .await
                .map_err(|source| LoadError::Execution { step, source })?;
        }
        Ok(scalar)
    }

    fn statements_for(&self, step: StepName) -> Vec<Statement> {
        statements_for(&self.table, &self.source, self.statement_timeout, step)
    }
}

/// Statements a load would send, step by step, without a gateway
///
/// Nothing is validated here; a malformed source still renders.
pub fn plan_load(
    table: &TableDescriptor,
    source: &DataSource,
    statement_timeout: StatementTimeout,
) -> Vec<(StepName, Vec<Statement>)> {
    StepName::ALL
        .into_iter()
        .map(|step| (step, statements_for(table, source, statement_timeout, step)))
        .collect()
}

fn statements_for(
    table: &TableDescriptor,
    source: &DataSource,
    statement_timeout: StatementTimeout,
    step: StepName,
) -> Vec<Statement> {
    match step {
        StepName::Reset | StepName::ValidateSource => Vec::new(),
        StepName::SetStatementTimeout => statement_timeout.statement().into_iter().collect(),
        StepName::DropStaging => vec![table.drop_staging_statement().into()],
        StepName::CreateStaging => vec![table.create_staging_statement().into()],
        StepName::LoadIntoStaging => vec![table.bound_load_statement(source)],
        StepName::CreateRebuild => vec![
            table.drop_rebuild_statement().into(),
            table.create_rebuild_statement().into(),
        ],
        StepName::CreateIndex => vec![table.create_index_statement().into()],
        StepName::PopulateRebuild => vec![table.populate_rebuild_statement().into()],
        StepName::AnalyzeRebuild => vec![table.analyze_rebuild_statement().into()],
        StepName::Switch => vec![table.switch_statement().into()],
    }
}
