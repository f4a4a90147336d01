//! Data sources for the staging table
//!
//! A data source describes where the input rows come from and how to move
//! them into a staging table:
//! - Local file: read by the database server with `COPY`
//! - Object store: imported from S3 through the `aws_s3` extension
//! - Inline rows: rows held in memory, inserted with one multi-row `INSERT`
//!
//! Every source must pass [`DataSource::validate`] before its load
//! statement is trusted.

pub mod inline;
pub mod local;
pub mod object_store;

pub use inline::InlineRowSource;
pub use local::LocalFileSource;
pub use object_store::ObjectStoreSource;

use crate::statement::Statement;
use crate::validation::ValidationResult;

/// Where the rows of a load come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// CSV file on the database server's filesystem
    LocalFile(LocalFileSource),
    /// CSV object in an S3 bucket
    ObjectStore(ObjectStoreSource),
    /// Header plus data rows held in memory
    InlineRows(InlineRowSource),
}

impl DataSource {
    /// Check that the source can be rendered into a statement safely
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            DataSource::LocalFile(source) => source.validate(),
            DataSource::ObjectStore(source) => source.validate(),
            DataSource::InlineRows(source) => source.validate(),
        }
    }

    /// Render the statement that loads this source into `table`
    pub fn render_load_statement(&self, table: &str) -> String {
        match self {
            DataSource::LocalFile(source) => source.render_load_statement(table),
            DataSource::ObjectStore(source) => source.render_load_statement(table),
            DataSource::InlineRows(source) => source.render_load_statement(table),
        }
    }

    /// Load statement with values bound as parameters where the dialect allows it
    ///
    /// Only inline rows can bind their values; `COPY` and the S3 import
    /// function take their arguments as literals.
    pub fn bound_load_statement(&self, table: &str) -> Statement {
        match self {
            DataSource::InlineRows(source) => source.bound_load_statement(table),
            other => Statement::new(other.render_load_statement(table)),
        }
    }

    /// Short name of the source kind, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::LocalFile(_) => "local_file",
            DataSource::ObjectStore(_) => "object_store",
            DataSource::InlineRows(_) => "inline_rows",
        }
    }
}

impl From<LocalFileSource> for DataSource {
    fn from(source: LocalFileSource) -> Self {
        DataSource::LocalFile(source)
    }
}

impl From<ObjectStoreSource> for DataSource {
    fn from(source: ObjectStoreSource) -> Self {
        DataSource::ObjectStore(source)
    }
}

impl From<InlineRowSource> for DataSource {
    fn from(source: InlineRowSource) -> Self {
        DataSource::InlineRows(source)
    }
}
