//! Workbook file helpers
//!
//! Path splitting and naming rules for `.univer.md` workbook documents, and
//! creation of new empty workbooks on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::workbook::WORKBOOK_HEADING;
use crate::infrastructure::traits::FileSystem;

pub const WORKBOOK_EXTENSION: &str = ".univer.md";

/// Content of a freshly created workbook.
pub fn empty_workbook() -> String {
    format!("# {WORKBOOK_HEADING}\n{{}}\n")
}

/// Components of a slash-separated file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParts {
    /// Normalized folder part (`/` for none)
    pub folderpath: String,
    pub filename: String,
    /// Filename without its last extension
    pub basename: String,
}

/// Normalize a slash-separated path: `\` becomes `/`, repeated slashes collapse,
/// leading and trailing slashes are dropped. An empty result becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let joined = replaced
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

pub fn split_folder_and_filename(path: &str) -> FileParts {
    let (folder, filename) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };
    let basename = match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    };
    FileParts {
        folderpath: normalize_path(folder),
        filename: filename.to_string(),
        basename: basename.to_string(),
    }
}

/// Replace the last extension of `path` with `extension` (given without dot).
pub fn image_filename(path: &str, extension: &str) -> String {
    let stem = match path.rfind('.') {
        Some(idx) if !path[idx..].contains('/') => &path[..idx],
        _ => path,
    };
    format!("{stem}.{extension}")
}

/// Filename for a new workbook: prefix, formatted timestamp, extension.
pub fn workbook_filename(settings: &Settings, now: NaiveDateTime) -> ApplicationResult<String> {
    let mut name = settings.filename_prefix.clone();
    if !settings.filename_datetime.is_empty() {
        write!(name, "{}", now.format(&settings.filename_datetime)).map_err(|_| {
            ApplicationError::Config {
                message: format!(
                    "invalid filename_datetime format: `{}`",
                    settings.filename_datetime
                ),
            }
        })?;
    }
    name.push_str(WORKBOOK_EXTENSION);
    Ok(name)
}

/// Split `filename` into stem and extension; `.univer.md` counts as one.
fn stem_and_extension(filename: &str) -> (&str, &str) {
    if let Some(stem) = filename.strip_suffix(WORKBOOK_EXTENSION) {
        return (stem, WORKBOOK_EXTENSION);
    }
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    }
}

/// Service creating workbook files.
pub struct WorkbookFiles {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl WorkbookFiles {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// First free path among `folder/filename`, `folder/<stem>_0<ext>`,
    /// `folder/<stem>_1<ext>`, ...
    pub fn unique_filepath(&self, folder: &Path, filename: &str) -> PathBuf {
        let mut candidate = folder.join(filename);
        let (stem, extension) = stem_and_extension(filename);
        let mut i = 0usize;
        while self.fs.exists(&candidate) {
            candidate = folder.join(format!("{stem}_{i}{extension}"));
            i += 1;
        }
        candidate
    }

    /// Create `folder` unless it already exists as a directory.
    pub fn ensure_folder(&self, folder: &Path) -> ApplicationResult<()> {
        if self.fs.is_dir(folder) {
            return Ok(());
        }
        if self.fs.is_file(folder) {
            return Err(ApplicationError::FolderIsFile(folder.to_path_buf()));
        }
        debug!("creating folder {}", folder.display());
        self.fs
            .create_dir_all(folder)
            .with_path_context("create folder", folder)
    }

    /// Write an empty workbook at a unique path and return that path.
    ///
    /// `folder` defaults to the configured folder; `name` defaults to the
    /// generated filename and gets the workbook extension if it has none.
    #[instrument(level = "debug", skip(self))]
    pub fn create_workbook(
        &self,
        folder: Option<&Path>,
        name: Option<&str>,
        now: NaiveDateTime,
    ) -> ApplicationResult<PathBuf> {
        let folder = folder.unwrap_or(self.settings.folder.as_path());
        let filename = match name {
            Some(name) if name.ends_with(".md") => name.to_string(),
            Some(name) => format!("{name}{WORKBOOK_EXTENSION}"),
            None => workbook_filename(&self.settings, now)?,
        };

        self.ensure_folder(folder)?;
        let path = self.unique_filepath(folder, &filename);
        self.fs
            .write(&path, &empty_workbook())
            .with_path_context("write workbook", &path)?;
        info!("created workbook {}", path.display());
        Ok(path)
    }
}
