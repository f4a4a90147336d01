//! SQL statement carried from the generators to the execution gateway

use std::fmt;

use serde::{Deserialize, Serialize};

/// A statement and its positional text parameters (`$1`, `$2`, ...).
///
/// Statements without parameters may contain several `;`-separated commands
/// and are sent through the simple query protocol. Statements with
/// parameters must be a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement text
    pub text: String,
    /// Positional parameters, bound as text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl Statement {
    /// Create a statement without parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Create a statement with positional parameters
    pub fn with_params(text: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Whether the statement has bound parameters
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        if self.has_params() {
            write!(f, " -- {} bound parameter(s)", self.params.len())?;
        }
        Ok(())
    }
}
