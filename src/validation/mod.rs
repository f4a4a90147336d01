//! Validation functionality
//!
//! Provides the checks run before any statement reaches the database:
//! - Literal values (no single quotes, present when required)
//! - Identifiers (table and column names)
//! - Column type expressions

pub mod input;

pub use input::{
    ValidationError, ValidationResult, reject_quotes, validate_column_name, validate_data_type,
    validate_literal, validate_table_name,
};
