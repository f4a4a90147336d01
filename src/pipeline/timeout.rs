//! Session statement timeout

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::statement::Statement;

/// Statement timeout applied to the load session
///
/// Written as `"30min"`, `"45s"`, `"1500ms"`, `"2h"` or a bare number of
/// milliseconds. `"0"` in any unit, `"none"` and `"off"` mean no timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatementTimeout {
    /// Leave the server's timeout alone
    #[default]
    NoTimeout,
    /// Cancel any statement running longer than this
    Timeout(Duration),
}

impl StatementTimeout {
    /// Build from a duration, zero meaning no timeout
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            StatementTimeout::NoTimeout
        } else {
            StatementTimeout::Timeout(duration)
        }
    }

    /// The `SET` statement for this timeout, `None` when there is nothing to set
    pub fn statement(&self) -> Option<Statement> {
        match self {
            StatementTimeout::NoTimeout => None,
            StatementTimeout::Timeout(_) => Some(Statement::new(format!(
                "SET statement_timeout = '{}';",
                self
            ))),
        }
    }
}

impl FromStr for StatementTimeout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        if value == "none" || value == "off" {
            return Ok(StatementTimeout::NoTimeout);
        }

        let split = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        let (amount, unit) = value.split_at(split);
        let amount: u64 = amount
            .parse()
            .map_err(|_| format!("Invalid statement timeout: {}", s))?;

        let duration = match unit.trim() {
            "" | "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "min" => Duration::from_secs(amount.saturating_mul(60)),
            "h" => Duration::from_secs(amount.saturating_mul(3600)),
            other => {
                return Err(format!(
                    "Unknown statement timeout unit '{}'. Use ms, s, min or h.",
                    other
                ));
            }
        };

        Ok(StatementTimeout::from_duration(duration))
    }
}

impl fmt::Display for StatementTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementTimeout::NoTimeout => write!(f, "0min"),
            StatementTimeout::Timeout(duration) => {
                let millis = duration.as_millis().max(1);
                if millis % 3_600_000 == 0 {
                    write!(f, "{}h", millis / 3_600_000)
                } else if millis % 60_000 == 0 {
                    write!(f, "{}min", millis / 60_000)
                } else if millis % 1_000 == 0 {
                    write!(f, "{}s", millis / 1_000)
                } else {
                    write!(f, "{}ms", millis)
                }
            }
        }
    }
}

impl TryFrom<String> for StatementTimeout {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatementTimeout> for String {
    fn from(timeout: StatementTimeout) -> Self {
        timeout.to_string()
    }
}
