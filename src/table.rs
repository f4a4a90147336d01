//! Table descriptor and the statements of the staging-then-swap load
//!
//! A load never writes into the live table. Rows go into a temporary,
//! text-typed staging table (`tmp_<name>`), are cast into an unlogged,
//! indexed rebuild table (`target_<name>`), and the rebuild table replaces
//! the live one in a single transaction.

use serde::{Deserialize, Serialize};

use crate::source::DataSource;
use crate::statement::Statement;
use crate::validation::{
    ValidationError, ValidationResult, validate_column_name, validate_data_type,
    validate_table_name,
};

/// Prefix of the staging table name
pub const STAGING_PREFIX: &str = "tmp_";

/// Prefix of the rebuild table name
pub const REBUILD_PREFIX: &str = "target_";

/// Separator between a column name and its type in a typed column
pub const TYPE_SEPARATOR: &str = "::";

/// Text type every staging column is declared with
pub const STAGING_COLUMN_TYPE: &str = "varchar";

/// The live table a load replaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Live table name
    pub name: String,
    /// Columns as `column::type`, in table order
    pub typed_columns: Vec<String>,
    /// Columns of the unique index on the rebuild table
    pub index_columns: Vec<String>,
}

impl TableDescriptor {
    pub fn new(
        name: impl Into<String>,
        typed_columns: Vec<String>,
        index_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            typed_columns,
            index_columns,
        }
    }

    /// Name of the temporary table the source is loaded into
    pub fn staging_name(&self) -> String {
        format!("{}{}", STAGING_PREFIX, self.name)
    }

    /// Name of the table built to replace the live one
    pub fn rebuild_name(&self) -> String {
        format!("{}{}", REBUILD_PREFIX, self.name)
    }

    /// Typed columns with their `::type` suffix stripped
    pub fn plain_columns(&self) -> Vec<&str> {
        self.typed_columns
            .iter()
            .map(|column| plain_column(column))
            .collect()
    }

    /// Plain columns declared as text, for the staging table
    pub fn staging_columns(&self) -> Vec<String> {
        self.plain_columns()
            .into_iter()
            .map(|column| format!("{}{}{}", column, TYPE_SEPARATOR, STAGING_COLUMN_TYPE))
            .collect()
    }

    /// Check names and types before they are interpolated into statements
    pub fn validate(&self) -> ValidationResult<()> {
        validate_table_name(&self.name)?;

        if self.typed_columns.is_empty() {
            return Err(ValidationError::Empty("typed columns"));
        }
        for column in &self.typed_columns {
            let (name, data_type) = column.split_once(TYPE_SEPARATOR).ok_or_else(|| {
                ValidationError::InvalidFormat(
                    "typed column",
                    format!("'{}' should look like column::type", column),
                )
            })?;
            validate_column_name(name)?;
            validate_data_type(data_type)?;
        }

        if self.index_columns.is_empty() {
            return Err(ValidationError::Empty("index columns"));
        }
        let plain = self.plain_columns();
        for column in &self.index_columns {
            validate_column_name(column)?;
            if !plain.contains(&column.as_str()) {
                return Err(ValidationError::InvalidFormat(
                    "index column",
                    format!("'{}' is not one of the typed columns", column),
                ));
            }
        }

        Ok(())
    }

    /// Check that inline header cells name columns of this table
    ///
    /// Header cells are interpolated as identifiers into the staging insert,
    /// so each one must be a plain column name of [`Self::plain_columns`].
    /// Other sources carry no column names.
    pub fn validate_source_columns(&self, source: &DataSource) -> ValidationResult<()> {
        let DataSource::InlineRows(rows) = source else {
            return Ok(());
        };

        let plain = self.plain_columns();
        for column in rows.header() {
            validate_column_name(column)?;
            if !plain.contains(&column.as_str()) {
                return Err(ValidationError::InvalidFormat(
                    "inline header",
                    format!("'{}' is not one of the typed columns", column),
                ));
            }
        }

        Ok(())
    }

    pub fn drop_staging_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {};", self.staging_name())
    }

    pub fn create_staging_statement(&self) -> String {
        format!(
            "CREATE TEMPORARY TABLE IF NOT EXISTS {} ({});",
            self.staging_name(),
            self.staging_columns().join(", ")
        )
    }

    /// Statement loading `source` into the staging table, values inline
    pub fn load_statement(&self, source: &DataSource) -> String {
        source.render_load_statement(&self.staging_name())
    }

    /// Statement loading `source` into the staging table, values bound where possible
    pub fn bound_load_statement(&self, source: &DataSource) -> Statement {
        source.bound_load_statement(&self.staging_name())
    }

    pub fn drop_rebuild_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {};", self.rebuild_name())
    }

    pub fn create_rebuild_statement(&self) -> String {
        format!(
            "CREATE UNLOGGED TABLE IF NOT EXISTS {} ({});",
            self.rebuild_name(),
            self.typed_columns.join(", ")
        )
    }

    pub fn create_index_statement(&self) -> String {
        format!(
            "CREATE UNIQUE INDEX BY {} ({});",
            self.rebuild_name(),
            self.index_columns.join(", ")
        )
    }

    /// Copy staged rows into the rebuild table, returning the inserted count
    pub fn populate_rebuild_statement(&self) -> String {
        format!(
            "WITH inserted_rows AS (INSERT INTO {} ({}) SELECT {} FROM {} ON CONFLICT DO NOTHING RETURNING 1) SELECT COUNT(1) AS count FROM inserted_rows;",
            self.rebuild_name(),
            self.plain_columns().join(", "),
            self.typed_columns.join(", "),
            self.staging_name(),
        )
    }

    pub fn analyze_rebuild_statement(&self) -> String {
        format!("ANALYZE {};", self.rebuild_name())
    }

    /// Replace the live table with the rebuild table in one transaction
    pub fn switch_statement(&self) -> String {
        format!(
            "BEGIN;\nDROP TABLE IF EXISTS {name};\nALTER TABLE {rebuild} RENAME TO {name};\nCOMMIT;",
            name = self.name,
            rebuild = self.rebuild_name(),
        )
    }
}

fn plain_column(typed: &str) -> &str {
    typed
        .split_once(TYPE_SEPARATOR)
        .map_or(typed, |(name, _)| name)
}
