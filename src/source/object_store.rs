//! CSV object imported from S3 with the `aws_s3` extension

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, validate_literal};

/// Extension function used to import from S3
pub const IMPORT_FUNCTION: &str = "aws_s3.table_import_from_s3";

/// A CSV object in an S3 bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreSource {
    /// AWS region of the bucket
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub path: String,
}

impl ObjectStoreSource {
    pub fn new(
        region: impl Into<String>,
        bucket: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Each field is checked on its own, so fixing one field and validating
    /// again surfaces the next violation.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_literal("The AWS S3 region", &self.region)?;
        validate_literal("The AWS S3 bucket", &self.bucket)?;
        validate_literal("The path to the file in the AWS S3 bucket", &self.path)
    }

    pub fn render_load_statement(&self, table: &str) -> String {
        format!(
            "SELECT {}('{}', '', '(format csv)', '{}', '{}', '{}');",
            IMPORT_FUNCTION, table, self.region, self.bucket, self.path,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    fn valid() -> ObjectStoreSource {
        ObjectStoreSource::new("us-east-2", "mybucket", "/myfile.csv")
    }

    #[test]
    fn test_render_load_statement() {
        assert_eq!(
            valid().render_load_statement("mytable"),
            "SELECT aws_s3.table_import_from_s3('mytable', '', '(format csv)', 'us-east-2', 'mybucket', '/myfile.csv');"
        );
    }

    #[test]
    fn test_validate_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_each_field_alone() {
        let cases = [
            ObjectStoreSource {
                region: String::new(),
                ..valid()
            },
            ObjectStoreSource {
                bucket: String::new(),
                ..valid()
            },
            ObjectStoreSource {
                path: String::new(),
                ..valid()
            },
            ObjectStoreSource {
                region: "''us-east-2".to_string(),
                ..valid()
            },
            ObjectStoreSource {
                bucket: "''mybucket".to_string(),
                ..valid()
            },
            ObjectStoreSource {
                path: "''/myfile.csv".to_string(),
                ..valid()
            },
        ];

        for file in &cases {
            assert!(file.validate().is_err(), "expected failure for {:?}", file);
        }
    }

    #[test]
    fn test_validate_names_the_field() {
        let file = ObjectStoreSource {
            bucket: "my'bucket".to_string(),
            ..valid()
        };
        assert_eq!(
            file.validate(),
            Err(ValidationError::ContainsQuote("The AWS S3 bucket"))
        );
    }
}
