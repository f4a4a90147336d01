//! CSV file read by the database server

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, validate_literal};

/// A CSV file on a path the database server process can read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileSource {
    /// Server-side path to the file
    pub path: String,
}

impl LocalFileSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_literal("The path to the local file", &self.path)
    }

    pub fn render_load_statement(&self, table: &str) -> String {
        format!("COPY {} FROM {} WITH CSV;", table, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_render_load_statement() {
        let file = LocalFileSource::new("/myfile.csv");
        assert_eq!(
            file.render_load_statement("mytable"),
            "COPY mytable FROM /myfile.csv WITH CSV;"
        );
    }

    #[test]
    fn test_validate_valid() {
        assert!(LocalFileSource::new("/myfile.csv").validate().is_ok());
    }

    #[test]
    fn test_validate_invalid() {
        assert!(matches!(
            LocalFileSource::new("").validate(),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            LocalFileSource::new("''myfile.csv").validate(),
            Err(ValidationError::ContainsQuote(_))
        ));
    }
}
