//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sheetmd/sheetmd.toml`
//! 3. Local config: `<dir>/.sheetmd.toml` (usually the working directory)
//! 4. Environment variables: `SHEETMD_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

pub const GLOBAL_CONFIG_FILE: &str = "sheetmd.toml";
pub const LOCAL_CONFIG_FILE: &str = ".sheetmd.toml";
pub const ENV_PREFIX: &str = "SHEETMD";

/// Unified configuration for sheetmd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Folder where new workbooks are created
    pub folder: PathBuf,
    /// Prefix of generated workbook filenames
    pub filename_prefix: String,
    /// chrono format string appended to the prefix; empty disables it
    pub filename_datetime: String,
    /// Indentation width of emitted JSON
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            filename_prefix: "Workbook ".to_string(),
            filename_datetime: "%Y-%m-%d %H.%M.%S".to_string(),
            indent: 2,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub folder: Option<PathBuf>,
    pub filename_prefix: Option<String>,
    pub filename_datetime: Option<String>,
    pub indent: Option<usize>,
}

/// Get the XDG config directory for sheetmd.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sheetmd").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local_dir` is searched for `.sheetmd.toml`; pass `None` to skip the
    /// local layer.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Overlay values win where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            folder: overlay.folder.clone().unwrap_or_else(|| self.folder.clone()),
            filename_prefix: overlay
                .filename_prefix
                .clone()
                .unwrap_or_else(|| self.filename_prefix.clone()),
            filename_datetime: overlay
                .filename_datetime
                .clone()
                .unwrap_or_else(|| self.filename_datetime.clone()),
            indent: overlay.indent.unwrap_or(self.indent),
        }
    }

    /// Apply SHEETMD_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("folder") {
            settings.folder = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("filename_prefix") {
            settings.filename_prefix = val;
        }
        if let Ok(val) = config.get_string("filename_datetime") {
            settings.filename_datetime = val;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("{ENV_PREFIX}_INDENT must be a non-negative integer, got `{val}`"),
            })?;
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the workbook folder.
    fn expand_paths(&mut self) {
        let raw = self.folder.to_string_lossy().to_string();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.folder = PathBuf::from(expanded.as_ref());
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.indent > 16 {
            return Err(ApplicationError::Config {
                message: format!("indent must be at most 16, got {}", self.indent),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sheetmd configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sheetmd/sheetmd.toml
#   Local:  ./.sheetmd.toml
#   Env:    SHEETMD_* environment variables

# Folder where `sheetmd new` creates workbooks (~ and $VAR are expanded)
# folder = "."

# Filename of new workbooks: <prefix><datetime>.univer.md
# filename_prefix = "Workbook "

# chrono format string; set to "" to omit the timestamp
# filename_datetime = "%Y-%m-%d %H.%M.%S"

# Indentation width of emitted JSON
# indent = 2
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
