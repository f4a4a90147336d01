//! Input validation for load jobs.
//!
//! Everything a load job interpolates into SQL passes through here first:
//! data source fields, inline cells, table and column names, column types.
//! Inline header cells are checked as column names against the table
//! descriptor by `TableDescriptor::validate_source_columns`.
//!
//! # Security
//!
//! Statements are assembled from strings, so validation rejects:
//! - single quotes in any value rendered inside a string literal
//! - identifiers that are not plain `[A-Za-z_][A-Za-z0-9_]*` names
//! - statement separators and SQL comments in column types

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length for table names (PostgreSQL truncates identifiers at 63 bytes)
pub const MAX_TABLE_NAME_LENGTH: usize = 63;

/// Maximum length for column names
pub const MAX_COLUMN_NAME_LENGTH: usize = 63;

/// Maximum length for a column type expression
pub const MAX_DATA_TYPE_LENGTH: usize = 255;

/// Longest prefix added to a live table name ("target_")
const LONGEST_DERIVED_PREFIX: usize = 7;

static RE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// Errors raised when a data source or table descriptor is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is empty
    #[error("{0} should be present")]
    Empty(&'static str),

    /// A value rendered inside a string literal contains a single quote
    #[error("{0} should NOT contain single quotes")]
    ContainsQuote(&'static str),

    /// Inline rows have no header or no data row
    #[error("There's nothing to import")]
    NothingToImport,

    /// A header cell is blank
    #[error("Headers should not be blank (column {column})")]
    BlankHeader { column: usize },

    /// A row is not as wide as the header
    #[error("Unexpected length of line {row} (expected {expected}, actual {actual})")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An inline cell contains a single quote
    #[error("The line {row} (item {column}) should NOT contain single quotes")]
    QuotedCell { row: usize, column: usize },

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),

    /// Input is a reserved word
    #[error("{field} cannot be a reserved word: {word}")]
    ReservedWord { field: &'static str, word: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a value that will be rendered inside a single-quoted literal.
///
/// # Examples
///
/// ```
/// use pg_hotswap::validation::input::validate_literal;
///
/// assert!(validate_literal("bucket", "mybucket").is_ok());
/// assert!(validate_literal("bucket", "").is_err());
/// assert!(validate_literal("bucket", "my'bucket").is_err());
/// ```
pub fn validate_literal(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    reject_quotes(field, value)
}

/// Reject single quotes without requiring the value to be present.
pub fn reject_quotes(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.contains('\'') {
        return Err(ValidationError::ContainsQuote(field));
    }
    Ok(())
}

/// Validate the live table name.
///
/// The name must leave room for the `target_` prefix within PostgreSQL's
/// identifier limit, otherwise the staging and rebuild names would be
/// truncated and could collide.
///
/// # Examples
///
/// ```
/// use pg_hotswap::validation::input::validate_table_name;
///
/// assert!(validate_table_name("users").is_ok());
/// assert!(validate_table_name("user_orders").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name("123_invalid").is_err());
/// ```
pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    let max = MAX_TABLE_NAME_LENGTH - LONGEST_DERIVED_PREFIX;
    validate_identifier("table name", name, max)
}

/// Validate a plain column name.
///
/// # Examples
///
/// ```
/// use pg_hotswap::validation::input::validate_column_name;
///
/// assert!(validate_column_name("id").is_ok());
/// assert!(validate_column_name("user_name").is_ok());
/// assert!(validate_column_name("user name").is_err());
/// assert!(validate_column_name("").is_err());
/// ```
pub fn validate_column_name(name: &str) -> ValidationResult<()> {
    validate_identifier("column name", name, MAX_COLUMN_NAME_LENGTH)
}

fn validate_identifier(field: &'static str, name: &str, max: usize) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if name.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: name.len(),
        });
    }

    if !RE_IDENTIFIER.is_match(name) {
        return match name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            Some(c) => Err(ValidationError::InvalidCharacters {
                field,
                reason: format!("invalid character: '{}'", c),
            }),
            None => Err(ValidationError::InvalidFormat(
                field,
                "must start with a letter or underscore".to_string(),
            )),
        };
    }

    if is_sql_reserved_word(name) {
        return Err(ValidationError::ReservedWord {
            field,
            word: name.to_string(),
        });
    }

    Ok(())
}

/// Validate a column type expression such as `text` or `numeric(10, 2)`.
///
/// # Examples
///
/// ```
/// use pg_hotswap::validation::input::validate_data_type;
///
/// assert!(validate_data_type("numeric(10,2)").is_ok());
/// assert!(validate_data_type("timestamp with time zone").is_ok());
/// assert!(validate_data_type("text[]").is_ok());
/// assert!(validate_data_type("text; DROP TABLE users;--").is_err());
/// ```
pub fn validate_data_type(data_type: &str) -> ValidationResult<()> {
    if data_type.trim().is_empty() {
        return Err(ValidationError::Empty("data type"));
    }

    if data_type.len() > MAX_DATA_TYPE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "data type",
            max: MAX_DATA_TYPE_LENGTH,
            actual: data_type.len(),
        });
    }

    if data_type.contains(';') || data_type.contains("--") || data_type.contains("/*") {
        return Err(ValidationError::InvalidCharacters {
            field: "data type",
            reason: "contains SQL comment or statement separator".to_string(),
        });
    }

    for c in data_type.chars() {
        if !c.is_alphanumeric() && !matches!(c, '(' | ')' | ',' | ' ' | '_' | '[' | ']') {
            return Err(ValidationError::InvalidCharacters {
                field: "data type",
                reason: format!("invalid character: '{}'", c),
            });
        }
    }

    Ok(())
}

/// Check if a word is a PostgreSQL reserved keyword.
///
/// Only the keywords that cannot be used as a bare table or column name are
/// listed; non-reserved keywords like `name` or `type` are fine.
fn is_sql_reserved_word(word: &str) -> bool {
    const RESERVED_WORDS: &[&str] = &[
        "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "both", "case", "cast",
        "check", "collate", "column", "constraint", "create", "current_date", "current_role",
        "current_time", "current_timestamp", "current_user", "default", "deferrable", "desc",
        "distinct", "do", "else", "end", "except", "false", "fetch", "for", "foreign", "from",
        "grant", "group", "having", "in", "initially", "intersect", "into", "lateral", "leading",
        "limit", "localtime", "localtimestamp", "not", "null", "offset", "on", "only", "or",
        "order", "placing", "primary", "references", "returning", "select", "session_user",
        "some", "symmetric", "table", "then", "to", "trailing", "true", "union", "unique", "user",
        "using", "variadic", "when", "where", "window", "with",
    ];

    RESERVED_WORDS.contains(&word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_literal() {
        assert!(validate_literal("path", "/data/users.csv").is_ok());
        assert_eq!(
            validate_literal("path", ""),
            Err(ValidationError::Empty("path"))
        );
        assert_eq!(
            validate_literal("path", "''users.csv"),
            Err(ValidationError::ContainsQuote("path"))
        );
    }

    #[test]
    fn test_reject_quotes_allows_empty() {
        assert!(reject_quotes("cell", "").is_ok());
        assert!(reject_quotes("cell", "it's").is_err());
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("users").is_ok());
        assert!(validate_table_name("_private").is_ok());
        assert!(validate_table_name("Users2024").is_ok());

        assert!(matches!(
            validate_table_name(""),
            Err(ValidationError::Empty("table name"))
        ));
        assert!(matches!(
            validate_table_name("9lives"),
            Err(ValidationError::InvalidFormat(..))
        ));
        assert!(matches!(
            validate_table_name("users; drop"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_table_name("select"),
            Err(ValidationError::ReservedWord { .. })
        ));
    }

    #[test]
    fn test_validate_table_name_leaves_room_for_prefix() {
        let longest = "a".repeat(MAX_TABLE_NAME_LENGTH - LONGEST_DERIVED_PREFIX);
        assert!(validate_table_name(&longest).is_ok());

        let too_long = format!("{}a", longest);
        assert!(matches!(
            validate_table_name(&too_long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_column_name_allows_non_reserved_keywords() {
        assert!(validate_column_name("name").is_ok());
        assert!(validate_column_name("type").is_ok());
        assert!(validate_column_name("user").is_err());
    }

    #[test]
    fn test_validate_data_type() {
        assert!(validate_data_type("text").is_ok());
        assert!(validate_data_type("varchar(255)").is_ok());
        assert!(validate_data_type("").is_err());
        assert!(validate_data_type("text /* x */").is_err());
        assert!(validate_data_type("text'").is_err());
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ValidationError::RowWidth {
            row: 2,
            expected: 3,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected length of line 2 (expected 3, actual 1)"
        );

        let err = ValidationError::QuotedCell { row: 1, column: 0 };
        assert_eq!(
            err.to_string(),
            "The line 1 (item 0) should NOT contain single quotes"
        );
    }
}
