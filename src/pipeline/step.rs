//! Pipeline steps and their log entries

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named step of the load, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
    Reset,
    ValidateSource,
    SetStatementTimeout,
    DropStaging,
    CreateStaging,
    LoadIntoStaging,
    CreateRebuild,
    CreateIndex,
    PopulateRebuild,
    AnalyzeRebuild,
    Switch,
}

impl StepName {
    /// Every step, in the order a run executes them
    ///
    /// Eleven steps: `validate-source` sits between `reset` and
    /// `set-statement-timeout`, so a fully successful run logs eleven
    /// outcomes. Use `ALL.len()` rather than a fixed count.
    pub const ALL: [StepName; 11] = [
        StepName::Reset,
        StepName::ValidateSource,
        StepName::SetStatementTimeout,
        StepName::DropStaging,
        StepName::CreateStaging,
        StepName::LoadIntoStaging,
        StepName::CreateRebuild,
        StepName::CreateIndex,
        StepName::PopulateRebuild,
        StepName::AnalyzeRebuild,
        StepName::Switch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Reset => "reset",
            StepName::ValidateSource => "validate-source",
            StepName::SetStatementTimeout => "set-statement-timeout",
            StepName::DropStaging => "drop-staging",
            StepName::CreateStaging => "create-staging",
            StepName::LoadIntoStaging => "load-into-staging",
            StepName::CreateRebuild => "create-rebuild",
            StepName::CreateIndex => "create-index",
            StepName::PopulateRebuild => "populate-rebuild",
            StepName::AnalyzeRebuild => "analyze-rebuild",
            StepName::Switch => "switch",
        }
    }

    /// 1-based position in [`StepName::ALL`]
    pub fn position(&self) -> usize {
        StepName::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |index| index + 1)
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log entry of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    /// Step that ran
    pub name: StepName,
    /// Whether it finished without error
    pub succeeded: bool,
    /// Wall-clock duration in microseconds
    pub duration_micros: u64,
}
