//! Outcome of a load run

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::step::{StepName, StepOutcome};
use crate::database::GatewayError;
use crate::validation::ValidationError;

/// Error recorded by a failed step
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The data source or table descriptor is malformed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The database rejected or failed a statement
    #[error("Step {step} failed: {source}")]
    Execution {
        step: StepName,
        source: GatewayError,
    },
}

/// Result of [`LoadPipeline::run`](super::LoadPipeline::run)
///
/// `errors` is empty if and only if every executed step succeeded. A failed
/// step is always the last entry of `step_log`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    /// Identifier of the run, also recorded on the tracing span
    pub run_id: Uuid,
    /// Live table the run targeted
    pub table: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished, including the gateway release
    pub finished_at: Option<DateTime<Utc>>,
    /// Scalar returned by the load into staging, if any
    pub rows_staged: Option<String>,
    /// Scalar returned by the rebuild population, usually the inserted count
    pub rows_loaded: Option<String>,
    /// Executed steps in order
    pub step_log: Vec<StepOutcome>,
    /// Errors of failed steps
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<LoadError>,
}

impl LoadResult {
    /// Create an empty result for a run
    pub fn new(run_id: Uuid, table: impl Into<String>) -> Self {
        Self {
            run_id,
            table: table.into(),
            started_at: Utc::now(),
            finished_at: None,
            rows_staged: None,
            rows_loaded: None,
            step_log: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Whether no step has failed
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// First step that failed, if any
    pub fn failed_step(&self) -> Option<StepName> {
        self.step_log
            .iter()
            .find(|outcome| !outcome.succeeded)
            .map(|outcome| outcome.name)
    }

    /// Number of rows inserted into the rebuild table
    pub fn rows_loaded_count(&self) -> Option<u64> {
        self.rows_loaded.as_deref().and_then(|v| v.trim().parse().ok())
    }

    /// Sum of the step durations
    pub fn total_duration_micros(&self) -> u64 {
        self.step_log
            .iter()
            .map(|outcome| outcome.duration_micros)
            .sum()
    }

    /// Fold one executed step into the result
    pub(crate) fn record(
        mut self,
        step: StepName,
        duration_micros: u64,
        outcome: Result<Option<String>, LoadError>,
    ) -> Self {
        if step == StepName::Reset {
            self.step_log.clear();
            self.errors.clear();
            self.rows_staged = None;
            self.rows_loaded = None;
        }

        let succeeded = match outcome {
            Ok(scalar) => {
                match step {
                    StepName::LoadIntoStaging if scalar.is_some() => self.rows_staged = scalar,
                    StepName::PopulateRebuild if scalar.is_some() => self.rows_loaded = scalar,
                    _ => {}
                }
                true
            }
            Err(e) => {
                self.errors.push(e);
                false
            }
        };

        self.step_log.push(StepOutcome {
            name: step,
            succeeded,
            duration_micros,
        });
        self
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}

fn serialize_errors<S: Serializer>(errors: &[LoadError], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}
