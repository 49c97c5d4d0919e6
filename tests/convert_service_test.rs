//! Tests for ConversionService

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use sheetmd::application::services::{ConversionService, ConvertOptions};
use sheetmd::application::ApplicationError;
use sheetmd::domain::{DomainError, TokenKind};
use sheetmd::infrastructure::traits::RealFileSystem;
use sheetmd::util::testing::{init_test_setup, write_fixture, SAMPLE_WORKBOOK};

fn service() -> ConversionService {
    init_test_setup();
    ConversionService::new(Arc::new(RealFileSystem), 2)
}

fn parse(json: &str) -> Value {
    serde_json::from_str(json).expect("service emits valid JSON")
}

#[test]
fn given_workbook_file_when_converting_to_json_then_splits_frontmatter_and_builds_tree() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_fixture(temp.path(), "Budget.univer.md", SAMPLE_WORKBOOK);

    // Act
    let out = service()
        .convert_file_to_json(&path, ConvertOptions::default())
        .unwrap();

    // Assert
    assert_eq!(out.frontmatter.as_deref(), Some("excel-pro-plugin: parsed"));
    let value = parse(&out.json);
    assert_eq!(value["workbook"]["name"], json!("Budget"));
    assert_eq!(
        value["workbook"]["sheets"]["s1"]["cellData"]["0"]["1"],
        json!({"v": 4200})
    );
    assert_eq!(value["workbook"]["sheets"]["s2"], json!({"name": "Empty"}));
}

#[test]
fn given_document_without_frontmatter_when_converting_then_frontmatter_is_none() {
    let out = service()
        .markdown_to_json("# A\n{\"x\":1}\n", ConvertOptions::default())
        .unwrap();

    assert!(out.frontmatter.is_none());
    assert_eq!(out.json, "{\n  \"A\": {\n    \"x\": 1\n  }\n}");
}

#[test]
fn given_empty_document_when_converting_then_json_is_empty_object() {
    let out = service()
        .markdown_to_json("", ConvertOptions::default())
        .unwrap();

    assert_eq!(out.json, "{}");
}

#[test]
fn given_json_with_frontmatter_when_converting_to_markdown_then_prepends_fence() {
    // Arrange
    let json = r#"{"id":"wb","sheets":{"S":{"cellData":{"0":{"0":{"v":1}}}}}}"#;

    // Act
    let markdown = service()
        .json_to_markdown(json, Some("excel-pro-plugin: parsed"))
        .unwrap();

    // Assert
    assert!(markdown.starts_with("---\nexcel-pro-plugin: parsed\n---\n# workbook\n"));
    assert!(markdown.ends_with("###### 0\n{\"v\":1}\n"));
}

#[test]
fn given_sample_when_converting_both_ways_then_frontmatter_survives() {
    let svc = service();
    let out = svc
        .markdown_to_json(SAMPLE_WORKBOOK, ConvertOptions::default())
        .unwrap();
    let inner = parse(&out.json)["workbook"].to_string();

    let markdown = svc
        .json_to_markdown(&inner, out.frontmatter.as_deref())
        .unwrap();
    let again = svc
        .markdown_to_json(&markdown, ConvertOptions::default())
        .unwrap();

    assert_eq!(again, out);
}

#[test]
fn given_invalid_json_when_converting_to_markdown_then_invalid_json_error() {
    let err = service().json_to_markdown("{not json", None).unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidJson(_)));
}

#[test]
fn given_json_without_sheets_when_converting_to_markdown_then_schema_mismatch() {
    let err = service().json_to_markdown(r#"{"a":1}"#, None).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::SchemaMismatch { .. })
    ));
}

#[test]
fn given_missing_file_when_converting_then_operation_failed_with_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.md");

    let err = service()
        .convert_file_to_json(&missing, ConvertOptions::default())
        .unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.contains("missing.md"), "{context}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_output_path_in_new_folder_when_writing_then_creates_parents() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out/nested/result.json");

    service().write_output(&target, "{}\n").unwrap();

    assert_eq!(std::fs::read_to_string(target).unwrap(), "{}\n");
}

#[test]
fn given_document_when_building_outline_then_lists_heading_titles() {
    let tree = service().outline(SAMPLE_WORKBOOK, "Budget").unwrap();

    let rendered = tree.to_string();

    assert!(rendered.starts_with("Budget\n"));
    for title in ["workbook", "sheets", "s1", "cellData", "s2"] {
        assert!(rendered.contains(title), "missing {title} in {rendered}");
    }
    assert!(!rendered.contains("excel-pro-plugin"));
}

#[test]
fn given_document_with_frontmatter_when_tokenizing_then_starts_at_first_heading() {
    let tokens = service().tokens(SAMPLE_WORKBOOK);

    assert_eq!(tokens[0].kind, TokenKind::HeadingOpen);
    assert_eq!(tokens[1].content, "workbook");
}
