//! Workbook serializer: encodes a spreadsheet-shaped tree as heading text.
//!
//! The layout is fixed and is not a general inverse of the tree builder:
//!
//! ```text
//! # workbook
//! {root without "sheets"}
//! ## sheets
//! ### <sheet>
//! {sheet without "cellData"}
//! #### cellData
//! ##### <row>
//! ###### <column>
//! {cell}
//! ```
//!
//! Every shape violation is reported as [`DomainError::SchemaMismatch`];
//! only `cellData` may be absent.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::strip::stripped_shallow;
use crate::domain::token::HEADING_MARKER;

pub const WORKBOOK_HEADING: &str = "workbook";
pub const SHEETS_KEY: &str = "sheets";
pub const CELL_DATA_KEY: &str = "cellData";

/// Serialize a workbook tree. The input is left untouched.
#[instrument(level = "debug", skip_all)]
pub fn workbook_to_markdown(root: &Value) -> DomainResult<String> {
    let mut writer = WorkbookWriter::default();
    writer.write_workbook(root)?;
    debug!(lines = writer.out.lines().count(), "workbook serialized");
    Ok(writer.out)
}

#[derive(Debug, Default)]
struct WorkbookWriter {
    out: String,
}

impl WorkbookWriter {
    fn write_workbook(&mut self, root: &Value) -> DomainResult<()> {
        let root = expect_object(&stripped_shallow(root), "$")?;
        let sheets = match root.get(SHEETS_KEY) {
            Some(sheets) => expect_object(sheets, SHEETS_KEY)?,
            None => return Err(DomainError::schema(SHEETS_KEY, "a map of sheets")),
        };

        self.heading(1, WORKBOOK_HEADING);
        self.json_line(&without(&root, SHEETS_KEY));

        for (sheet_key, sheet) in &sheets {
            self.write_sheet(sheet_key, sheet)?;
        }
        Ok(())
    }

    fn write_sheet(&mut self, sheet_key: &str, sheet: &Value) -> DomainResult<()> {
        let path = format!("{SHEETS_KEY}.{sheet_key}");
        let sheet = expect_object(&stripped_shallow(sheet), &path)?;

        self.heading(2, SHEETS_KEY);
        self.heading(3, sheet_key);
        self.json_line(&without(&sheet, CELL_DATA_KEY));

        if let Some(cell_data) = sheet.get(CELL_DATA_KEY) {
            let path = format!("{path}.{CELL_DATA_KEY}");
            let cell_data = expect_object(&stripped_shallow(cell_data), &path)?;
            self.heading(4, CELL_DATA_KEY);
            for (row_key, row) in &cell_data {
                let row_path = format!("{path}.{row_key}");
                let row = expect_object(&stripped_shallow(row), &row_path)?;
                for (col_key, cell) in &row {
                    self.heading(5, row_key);
                    self.heading(6, col_key);
                    self.json_line(&stripped_shallow(cell));
                }
            }
        }
        Ok(())
    }

    fn heading(&mut self, depth: usize, title: &str) {
        self.out.push_str(&HEADING_MARKER.repeat(depth));
        self.out.push(' ');
        self.out.push_str(title);
        self.out.push('\n');
    }

    fn json_line(&mut self, value: &Value) {
        self.out.push_str(&value.to_string());
        self.out.push('\n');
    }
}

fn expect_object(value: &Value, path: &str) -> DomainResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        _ => Err(DomainError::schema(path, "an object")),
    }
}

fn without(map: &Map<String, Value>, key: &str) -> Value {
    let mut copy = map.clone();
    copy.retain(|k, _| k != key);
    Value::Object(copy)
}
