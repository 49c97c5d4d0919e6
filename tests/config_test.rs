//! Tests for layered Settings loading

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use sheetmd::application::ApplicationError;
use sheetmd::config::{local_config_path, Settings};

fn write(path: &std::path::Path, content: &str) {
    std::fs::write(path, content).expect("write config");
}

// Loading reads SHEETMD_* from the process environment; tests that load hold this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn given_no_config_files_when_loading_then_uses_defaults() {
    let _env = env_lock();
    let temp = TempDir::new().unwrap();

    let settings =
        Settings::load_from(Some(&temp.path().join("absent.toml")), Some(temp.path())).unwrap();

    assert_eq!(settings.filename_prefix, "Workbook ");
    assert_eq!(settings.indent, 2);
}

#[test]
fn given_global_and_local_config_when_loading_then_local_wins_per_field() {
    // Arrange
    let _env = env_lock();
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("sheetmd.toml");
    write(&global, "filename_prefix = \"Global \"\nindent = 4\n");
    let project = temp.path().join("project");
    std::fs::create_dir(&project).unwrap();
    write(&local_config_path(&project), "indent = 3\nfolder = \"books\"\n");

    // Act
    let settings = Settings::load_from(Some(&global), Some(&project)).unwrap();

    // Assert
    assert_eq!(settings.filename_prefix, "Global ");
    assert_eq!(settings.indent, 3);
    assert_eq!(settings.folder, PathBuf::from("books"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error_names_file() {
    let _env = env_lock();
    let temp = TempDir::new().unwrap();
    write(&local_config_path(temp.path()), "indent = [\n");

    let err = Settings::load_from(None, Some(temp.path())).unwrap_err();

    match err {
        ApplicationError::Config { message } => {
            assert!(message.contains(".sheetmd.toml"), "{message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    let settings = Settings {
        indent: 8,
        ..Default::default()
    };

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed, settings);
}

#[test]
fn given_env_vars_when_loading_then_override_config_files() {
    // Arrange
    let _env = env_lock();
    let temp = TempDir::new().unwrap();
    write(&local_config_path(temp.path()), "indent = 3\nfilename_prefix = \"Local \"\n");
    std::env::set_var("SHEETMD_INDENT", "4");
    std::env::set_var("SHEETMD_FILENAME_PREFIX", "Env ");

    // Act
    let result = Settings::load_from(None, Some(temp.path()));
    std::env::remove_var("SHEETMD_INDENT");
    std::env::remove_var("SHEETMD_FILENAME_PREFIX");

    // Assert
    let settings = result.unwrap();
    assert_eq!(settings.indent, 4);
    assert_eq!(settings.filename_prefix, "Env ");
}

#[test]
fn given_non_numeric_indent_env_when_loading_then_config_error() {
    let _env = env_lock();
    std::env::set_var("SHEETMD_INDENT", "wide");

    let result = Settings::load_from(None, None);
    std::env::remove_var("SHEETMD_INDENT");

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
