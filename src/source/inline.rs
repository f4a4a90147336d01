//! Rows held in memory, inserted with a single multi-row `INSERT`

use std::io::Read;
use std::path::Path;

use crate::statement::Statement;
use crate::validation::{ValidationError, ValidationResult};

/// PostgreSQL accepts at most this many bind parameters per statement
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Header row followed by data rows
///
/// Row 0 holds the column names, the remaining rows hold values. The rows
/// cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRowSource {
    rows: Vec<Vec<String>>,
}

impl InlineRowSource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Read rows from CSV on the client side; the first record is the header.
    ///
    /// Records of uneven width are accepted here and reported by
    /// [`InlineRowSource::validate`], which names the offending row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(rows))
    }

    /// Read rows from a CSV file on the client machine
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// All rows, header first
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Column names
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of data rows (header excluded)
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.rows.len() < 2 {
            return Err(ValidationError::NothingToImport);
        }

        let width = self.rows[0].len();
        if width == 0 {
            return Err(ValidationError::NothingToImport);
        }

        if let Some(column) = self.rows[0].iter().position(|item| item.trim().is_empty()) {
            return Err(ValidationError::BlankHeader { column });
        }

        for (row, line) in self.rows.iter().enumerate() {
            if line.len() != width {
                return Err(ValidationError::RowWidth {
                    row,
                    expected: width,
                    actual: line.len(),
                });
            }
            if let Some(column) = line.iter().position(|item| item.contains('\'')) {
                return Err(ValidationError::QuotedCell { row, column });
            }
        }

        Ok(())
    }

    pub fn render_load_statement(&self, table: &str) -> String {
        let values: Vec<String> = self
            .data_rows()
            .map(|line| {
                let items: Vec<String> = line.iter().map(|item| format!("'{}'", item)).collect();
                format!("({})", items.join(", "))
            })
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES {};",
            table,
            self.header().join(", "),
            values.join(", ")
        )
    }

    /// Same insert with every cell bound as `$n`, numbered row by row.
    ///
    /// Falls back to literal values when the cell count exceeds
    /// [`MAX_BIND_PARAMS`].
    pub fn bound_load_statement(&self, table: &str) -> Statement {
        let cell_count: usize = self.data_rows().map(Vec::len).sum();
        if cell_count > MAX_BIND_PARAMS {
            tracing::debug!(
                "{} inline cells exceed the bind parameter limit, rendering literals",
                cell_count
            );
            return Statement::new(self.render_load_statement(table));
        }

        let mut params = Vec::with_capacity(cell_count);
        let values: Vec<String> = self
            .data_rows()
            .map(|line| {
                let placeholders: Vec<String> = line
                    .iter()
                    .map(|item| {
                        params.push(item.clone());
                        format!("${}", params.len())
                    })
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();

        let text = format!(
            "INSERT INTO {} ({}) VALUES {};",
            table,
            self.header().join(", "),
            values.join(", ")
        );
        Statement::with_params(text, params)
    }

    fn data_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows.iter().skip(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> InlineRowSource {
        InlineRowSource::new(
            lines
                .iter()
                .map(|line| line.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn users() -> InlineRowSource {
        rows(&[&["name", "email"], &["Andy", "andy@ex.com"], &["July", ""]])
    }

    #[test]
    fn test_render_load_statement() {
        assert_eq!(
            users().render_load_statement("mytable"),
            "INSERT INTO mytable (name, email) VALUES ('Andy', 'andy@ex.com'), ('July', '');"
        );
    }

    #[test]
    fn test_render_is_pure() {
        let source = users();
        assert_eq!(
            source.render_load_statement("tmp_users"),
            source.render_load_statement("tmp_users")
        );
    }

    #[test]
    fn test_bound_load_statement() {
        let statement = users().bound_load_statement("tmp_users");
        assert_eq!(
            statement.text,
            "INSERT INTO tmp_users (name, email) VALUES ($1, $2), ($3, $4);"
        );
        assert_eq!(statement.params, vec!["Andy", "andy@ex.com", "July", ""]);
    }

    #[test]
    fn test_validate_valid() {
        assert!(users().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid() {
        let cases = [
            rows(&[]),
            rows(&[&[]]),
            rows(&[&["foo", ""], &["1", "2"]]),
            rows(&[&["foo", "''bar"], &["1", "2"]]),
            rows(&[&["foo", "bar"], &["1"]]),
            rows(&[&["foo", "bar"], &["1", "''2"]]),
        ];

        for file in &cases {
            assert!(file.validate().is_err(), "expected failure for {:?}", file);
        }
    }

    #[test]
    fn test_validate_header_only() {
        assert_eq!(
            rows(&[&["foo", "bar"]]).validate(),
            Err(ValidationError::NothingToImport)
        );
    }

    #[test]
    fn test_validate_reports_row_and_widths() {
        assert_eq!(
            rows(&[&["a", "b"], &["1", "2"], &["3"]]).validate(),
            Err(ValidationError::RowWidth {
                row: 2,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_validate_reports_quoted_cell_position() {
        assert_eq!(
            rows(&[&["a", "b"], &["1", "it's"]]).validate(),
            Err(ValidationError::QuotedCell { row: 1, column: 1 })
        );
    }

    #[test]
    fn test_validate_blank_header() {
        assert_eq!(
            rows(&[&["a", "  "], &["1", "2"]]).validate(),
            Err(ValidationError::BlankHeader { column: 1 })
        );
    }

    #[test]
    fn test_from_csv_reader() {
        let csv = "name,email\nAndy,andy@ex.com\nJuly,\n";
        let source = InlineRowSource::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(source, users());
        assert_eq!(source.data_row_count(), 2);
        assert_eq!(source.header(), &["name".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_from_csv_reader_keeps_ragged_rows_for_validation() {
        let csv = "a,b\n1\n";
        let source = InlineRowSource::from_csv_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            source.validate(),
            Err(ValidationError::RowWidth { row: 1, .. })
        ));
    }
}
