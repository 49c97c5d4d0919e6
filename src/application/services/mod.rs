//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the FileSystem boundary trait but are themselves
//! concrete structs, not traits.

mod convert;
mod files;

pub use convert::{ConversionService, ConvertOptions, ConvertOutput};
pub use files::{
    empty_workbook, image_filename, normalize_path, split_folder_and_filename, workbook_filename,
    FileParts, WorkbookFiles, WORKBOOK_EXTENSION,
};
