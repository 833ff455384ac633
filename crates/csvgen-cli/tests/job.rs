//! Integration tests for job files.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use csvgen_cli::job::{JobConfig, JobError};
use csvgen_core::GeneratorOptions;
use csvgen_model::{CsvGenError, ErrorKind, ValueKind};

fn book_job() -> serde_json::Value {
    json!({
        "fields": [
            { "name": "Isbn", "kind": "text" },
            { "name": "Notes", "kind": "text" },
            { "name": "PageCount", "kind": "integer" },
            { "name": "Price", "kind": "decimal", "optional": true },
            { "name": "PublicationDate", "kind": "datetime" },
            { "name": "Summary", "kind": "text" },
            { "name": "Title", "kind": "text", "optional": true },
            { "name": "Test", "kind": "text", "optional": true }
        ],
        "field_rules": [{ "field": "Isbn", "visible": false }],
        "type_rules": [
            { "kind": "decimal", "pattern": "c" },
            { "kind": "datetime", "pattern": "%Y" }
        ],
        "records": [
            {
                "Isbn": "234523452345",
                "Notes": "Some notes",
                "PageCount": 500,
                "Price": "12.32",
                "PublicationDate": "2014-12-01",
                "Summary": "asdfasdf"
            },
            {
                "Isbn": "222222222222",
                "Notes": "Some more notes",
                "PageCount": 12,
                "Price": 52.2,
                "PublicationDate": "2024-01-01T00:00:00",
                "Summary": "Some summary",
                "Title": null
            }
        ]
    })
}

fn parse(value: serde_json::Value) -> JobConfig {
    serde_json::from_value(value).expect("valid job")
}

fn write_job(dir: &TempDir, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("job.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn test_book_job_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_job(&dir, &book_job());

    let job = JobConfig::from_path(&path).unwrap();
    let csv = job
        .build_generator(job.options.clone())
        .unwrap()
        .generate()
        .unwrap();

    insta::assert_snapshot!("book_job", csv);
}

#[test]
fn test_job_options_and_rule_contexts() {
    let mut value = book_job();
    value["options"] = json!({ "line_terminator": "crlf", "trailing_separator": false });
    value["field_rules"] = json!([
        { "field": "Isbn", "visible": false },
        { "field": "Notes", "visible": false },
        { "field": "Summary", "visible": false },
        { "field": "Title", "visible": false },
        { "field": "Test", "visible": false },
        { "field": "Price", "display_name": "Preis", "pattern": "C", "context": "de-DE" }
    ]);
    value["type_rules"] = json!([
        { "kind": "datetime", "context": { "name": "iso-date", "datetime_pattern": "%Y-%m-%d" } }
    ]);

    let job = parse(value);
    let csv = job
        .build_generator(job.options.clone())
        .unwrap()
        .generate()
        .unwrap();

    assert_eq!(
        csv,
        "\"PageCount\",\"Preis\",\"PublicationDate\"\r\n\
         \"500\",\"12,32 €\",\"2014-12-01\"\r\n\
         \"12\",\"52,20 €\",\"2024-01-01\"\r\n"
    );
}

#[test]
fn test_missing_and_null_values_are_absent() {
    let job = parse(book_job());
    let records = job.records().unwrap();
    let csv = job
        .build_generator(GeneratorOptions::default())
        .unwrap()
        .generate()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(csv.ends_with("\"Some summary\",\"\",\"\",\n"));
}

#[test]
fn test_value_of_wrong_kind_names_record_and_field() {
    let mut value = book_job();
    value["records"][1]["PageCount"] = json!("twelve");
    let err = parse(value).records().unwrap_err();

    match err {
        JobError::InvalidValue {
            record,
            ref field,
            kind,
            ..
        } => {
            assert_eq!(record, 1);
            assert_eq!(field, "PageCount");
            assert_eq!(kind, ValueKind::Integer);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "record 1: field 'PageCount' expects integer, got \"twelve\""
    );
}

#[test]
fn test_rule_errors_surface_from_the_generator() {
    let mut value = book_job();
    value["field_rules"] = json!([{ "field": "Summary", "pattern": "N2" }]);
    let err = parse(value)
        .build_generator(GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        JobError::Generator(ref inner) if inner.kind() == ErrorKind::Configuration
    ));

    let mut value = book_job();
    value["type_rules"] = json!([{ "kind": "boolean", "visible": false }]);
    let err = parse(value)
        .build_generator(GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        JobError::Generator(CsvGenError::UnknownKind {
            kind: ValueKind::Boolean
        })
    ));
}

#[test]
fn test_empty_record_list_is_rejected() {
    let mut value = book_job();
    value["records"] = json!([]);
    let err = parse(value)
        .build_generator(GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        JobError::Generator(CsvGenError::EmptyCollection)
    ));
}

#[test]
fn test_unreadable_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        JobConfig::from_path(&missing),
        Err(JobError::Read { .. })
    ));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"fields\": [").unwrap();
    assert!(matches!(
        JobConfig::from_path(&path),
        Err(JobError::Parse { .. })
    ));

    let path = write_job(&dir, &json!({ "fields": [], "records": [], "extra": 1 }));
    assert!(matches!(
        JobConfig::from_path(&path),
        Err(JobError::Parse { .. })
    ));
}

#[test]
fn test_field_kinds_accept_aliases() {
    let job = parse(json!({
        "fields": [
            { "name": "Id", "kind": "uuid" },
            { "name": "When", "kind": "Date" }
        ],
        "records": [{ "Id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "When": "2014-12-01" }]
    }));

    assert_eq!(job.fields[0].kind, ValueKind::Identifier);
    assert_eq!(job.fields[1].kind, ValueKind::DateTime);
    let csv = job
        .build_generator(GeneratorOptions::default())
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(
        csv,
        "\"Id\",\"When\",\n\"67e55044-10b1-426f-9247-bb680e5fe0c8\",\"2014-12-01 00:00:00\",\n"
    );
}
