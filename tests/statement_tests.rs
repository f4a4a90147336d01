//! Integration tests for source validation and statement rendering

use pg_hotswap::{
    DataSource, InlineRowSource, LocalFileSource, ObjectStoreSource, TableDescriptor,
    ValidationError,
};

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn inline(lines: &[&[&str]]) -> InlineRowSource {
    InlineRowSource::new(lines.iter().map(|line| strings(line)).collect())
}

#[test]
fn test_inline_rows_render_insert() {
    let source = inline(&[
        &["name", "email"],
        &["Andy", "andy@ex.com"],
        &["July", ""],
    ]);

    assert!(source.validate().is_ok());
    assert_eq!(
        source.render_load_statement("mytable"),
        "INSERT INTO mytable (name, email) VALUES ('Andy', 'andy@ex.com'), ('July', '');"
    );
}

#[test]
fn test_object_store_renders_import_call() {
    let source = ObjectStoreSource::new("us-east-2", "mybucket", "/myfile.csv");

    assert!(source.validate().is_ok());
    assert_eq!(
        source.render_load_statement("tmp_users"),
        "SELECT aws_s3.table_import_from_s3('tmp_users', '', '(format csv)', 'us-east-2', 'mybucket', '/myfile.csv');"
    );
}

#[test]
fn test_switch_ignores_column_configuration() {
    let bare = TableDescriptor::new("users", Vec::new(), Vec::new());
    let configured = TableDescriptor::new(
        "users",
        strings(&["id::bigint", "email::text"]),
        strings(&["id"]),
    );

    let expected =
        "BEGIN;\nDROP TABLE IF EXISTS users;\nALTER TABLE target_users RENAME TO users;\nCOMMIT;";
    assert_eq!(bare.switch_statement(), expected);
    assert_eq!(configured.switch_statement(), expected);
}

#[test]
fn test_local_file_validation() {
    assert!(LocalFileSource::new("/data/users.csv").validate().is_ok());
    assert_eq!(
        LocalFileSource::new("").validate(),
        Err(ValidationError::Empty("The path to the local file"))
    );
    assert_eq!(
        LocalFileSource::new("/data/o'brien.csv").validate(),
        Err(ValidationError::ContainsQuote("The path to the local file"))
    );
}

#[test]
fn test_inline_rows_failures_are_independent() {
    let missing_header = inline(&[&["Andy", "andy@ex.com"]]);
    assert_eq!(
        missing_header.validate(),
        Err(ValidationError::NothingToImport)
    );

    let ragged = inline(&[&["name", "email"], &["Andy"]]);
    assert_eq!(
        ragged.validate(),
        Err(ValidationError::RowWidth {
            row: 1,
            expected: 2,
            actual: 1
        })
    );

    let quoted = inline(&[&["name", "email"], &["O'Hara", "o@ex.com"]]);
    assert_eq!(
        quoted.validate(),
        Err(ValidationError::QuotedCell { row: 1, column: 0 })
    );
}

#[test]
fn test_render_is_pure() {
    let sources: Vec<DataSource> = vec![
        LocalFileSource::new("/data/users.csv").into(),
        ObjectStoreSource::new("us-east-2", "mybucket", "/users.csv").into(),
        inline(&[&["name"], &["Andy"]]).into(),
    ];

    for source in &sources {
        assert_eq!(
            source.render_load_statement("tmp_users"),
            source.render_load_statement("tmp_users")
        );
        assert_eq!(
            source.bound_load_statement("tmp_users"),
            source.bound_load_statement("tmp_users")
        );
    }
}

#[test]
fn test_naming_is_injective() {
    let names = ["a", "b", "users", "tmp_users", "target_users"];
    let mut generated = Vec::new();
    for name in names {
        let table = TableDescriptor::new(name, Vec::new(), Vec::new());
        assert_ne!(table.staging_name(), table.rebuild_name());
        generated.push(table.staging_name());
        generated.push(table.rebuild_name());
    }

    let mut unique = generated.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), generated.len());
}

#[test]
fn test_inline_csv_matches_inline_rows() {
    let csv = "name,email\nAndy,andy@ex.com\nJuly,\n";
    let from_csv = InlineRowSource::from_csv_reader(csv.as_bytes()).unwrap();
    let from_rows = inline(&[
        &["name", "email"],
        &["Andy", "andy@ex.com"],
        &["July", ""],
    ]);

    assert_eq!(from_csv.rows(), from_rows.rows());
    assert_eq!(from_csv.data_row_count(), 2);
}
