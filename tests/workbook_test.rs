//! Tests for the workbook serializer and its relation to the forward conversion

use serde_json::{json, Value};

use sheetmd::domain::{markdown_to_value, workbook_to_markdown, DomainError};

fn headings(markdown: &str) -> Vec<&str> {
    markdown
        .lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim())
        .collect()
}

#[test]
fn given_single_cell_workbook_when_serializing_then_emits_heading_path_and_cell() {
    // Arrange
    let root = json!({"sheets": {"Sheet1": {"cellData": {"0": {"0": {"v": 1}}}}}});

    // Act
    let markdown = workbook_to_markdown(&root).unwrap();

    // Assert
    assert_eq!(
        headings(&markdown),
        vec!["workbook", "sheets", "Sheet1", "cellData", "0", "0"]
    );
    assert_eq!(markdown.lines().last(), Some("{\"v\":1}"));
    assert!(markdown.ends_with('\n'));
}

#[test]
fn given_every_cell_when_serializing_then_row_heading_repeats_per_column() {
    let root = json!({"sheets": {"S": {"cellData": {"2": {"0": {"v": "a"}, "1": {"v": "b"}}}}}});

    let markdown = workbook_to_markdown(&root).unwrap();

    assert!(markdown.ends_with(
        "#### cellData\n##### 2\n###### 0\n{\"v\":\"a\"}\n##### 2\n###### 1\n{\"v\":\"b\"}\n"
    ));
}

#[test]
fn given_workbook_when_serializing_then_input_is_not_mutated() {
    let root = json!({"tag": "h1", "sheets": {"S": {"markup": "###", "cellData": {}}}});
    let before = root.clone();

    workbook_to_markdown(&root).unwrap();

    assert_eq!(root, before);
}

#[test]
fn given_workbook_when_round_tripping_then_result_is_wrapped_under_workbook_key() {
    // Arrange
    let original = json!({
        "id": "wb1",
        "name": "Budget",
        "sheets": {
            "s1": {
                "name": "Income",
                "rowCount": 100,
                "cellData": {
                    "0": {"0": {"v": "Salary"}, "1": {"v": 4200}},
                    "1": {"0": {"v": "Bonus", "s": {"bl": 1}}}
                }
            },
            "s2": {"name": "Empty"}
        }
    });

    // Act
    let markdown = workbook_to_markdown(&original).unwrap();
    let forward = markdown_to_value(&markdown).unwrap();

    // Assert - the round trip is stable but not identity
    assert_ne!(forward, original);
    assert_eq!(forward, json!({ "workbook": original }));
}

#[test]
fn given_empty_row_when_round_tripping_then_row_disappears() {
    let original = json!({"sheets": {"S": {"cellData": {"0": {}, "1": {"0": {"v": 1}}}}}});

    let forward = markdown_to_value(&workbook_to_markdown(&original).unwrap()).unwrap();

    assert_eq!(
        forward,
        json!({"workbook": {"sheets": {"S": {"cellData": {"1": {"0": {"v": 1}}}}}}})
    );
}

#[test]
fn given_forward_output_when_serializing_inner_workbook_then_reproduces_document() {
    let document = "# workbook\n{\"id\":1}\n## sheets\n### S\n{\"n\":\"x\"}\n#### cellData\n##### 0\n###### 0\n{\"v\":true}\n";

    let value = markdown_to_value(document).unwrap();
    let markdown = workbook_to_markdown(&value["workbook"]).unwrap();

    assert_eq!(markdown, document);
}

fn mismatch_path(root: Value) -> String {
    match workbook_to_markdown(&root) {
        Err(DomainError::SchemaMismatch { path, .. }) => path,
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}

#[test]
fn given_malformed_shapes_when_serializing_then_reports_offending_path() {
    assert_eq!(mismatch_path(json!([1])), "$");
    assert_eq!(mismatch_path(json!({"name": "no sheets"})), "sheets");
    assert_eq!(mismatch_path(json!({"sheets": [1, 2]})), "sheets");
    assert_eq!(mismatch_path(json!({"sheets": {"S": 3}})), "sheets.S");
    assert_eq!(
        mismatch_path(json!({"sheets": {"S": {"cellData": "none"}}})),
        "sheets.S.cellData"
    );
    assert_eq!(
        mismatch_path(json!({"sheets": {"S": {"cellData": {"0": null}}}})),
        "sheets.S.cellData.0"
    );
}
