//! Command dispatch: maps parsed arguments onto the application services.

use std::io;
use std::path::Path;

use chrono::Local;
use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{split_folder_and_filename, ConvertOptions};
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::domain::{extract_frontmatter, render_inline, TokenKind};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli, ctx: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::ToJson { file, output, raw }) => {
            cmd_to_json(ctx, file, output.as_deref(), *raw, cli.verbose)
        }
        Some(Commands::ToMd {
            file,
            output,
            frontmatter,
        }) => cmd_to_md(ctx, file, output.as_deref(), frontmatter.as_deref()),
        Some(Commands::New { folder, name }) => cmd_new(ctx, folder.as_deref(), name.as_deref()),
        Some(Commands::Outline { file }) => cmd_outline(ctx, file),
        Some(Commands::Tokens { file }) => cmd_tokens(ctx, file),
        Some(Commands::Frontmatter { file }) => cmd_frontmatter(ctx, file),
        Some(Commands::Config { command }) => cmd_config(ctx, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `sheetmd --help`".to_string(),
        )),
    }
}

fn read_input(ctx: &ServiceContainer, path: &Path) -> CliResult<String> {
    Ok(ctx
        .fs
        .read_to_string(path)
        .with_path_context("read input", path)?)
}

fn emit(ctx: &ServiceContainer, target: Option<&Path>, content: &str) -> CliResult<()> {
    match target {
        Some(path) => {
            ctx.conversion.write_output(path, content)?;
            output::action("Wrote", &path.display());
        }
        None => output::info(content.trim_end_matches('\n')),
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_to_json(
    ctx: &ServiceContainer,
    file: &Path,
    target: Option<&Path>,
    raw: bool,
    verbose: bool,
) -> CliResult<()> {
    let options = ConvertOptions {
        keep_bookkeeping: raw,
    };
    let converted = ctx.conversion.convert_file_to_json(file, options)?;
    if let Some(yaml) = &converted.frontmatter {
        debug!("frontmatter: {} bytes", yaml.len());
        if verbose {
            output::warning("frontmatter is not part of the JSON output");
        }
    }
    emit(ctx, target, &format!("{}\n", converted.json))
}

#[instrument(skip(ctx))]
fn cmd_to_md(
    ctx: &ServiceContainer,
    file: &Path,
    target: Option<&Path>,
    frontmatter: Option<&Path>,
) -> CliResult<()> {
    let yaml = match frontmatter {
        Some(path) => {
            let text = read_input(ctx, path)?;
            Some(extract_frontmatter(&text).unwrap_or(text))
        }
        None => None,
    };
    let markdown = ctx
        .conversion
        .convert_file_to_markdown(file, yaml.as_deref())?;
    emit(ctx, target, &markdown)
}

#[instrument(skip(ctx))]
fn cmd_new(ctx: &ServiceContainer, folder: Option<&Path>, name: Option<&str>) -> CliResult<()> {
    let path = ctx
        .files
        .create_workbook(folder, name, Local::now().naive_local())?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

fn cmd_outline(ctx: &ServiceContainer, file: &Path) -> CliResult<()> {
    let text = read_input(ctx, file)?;
    let label = split_folder_and_filename(&file.to_string_lossy()).filename;
    let tree = ctx.conversion.outline(&text, &label)?;
    output::info(&tree);
    Ok(())
}

fn cmd_tokens(ctx: &ServiceContainer, file: &Path) -> CliResult<()> {
    let text = read_input(ctx, file)?;
    for token in ctx.conversion.tokens(&text) {
        let content = if token.kind == TokenKind::Inline {
            render_inline(&token.children)
        } else {
            token.markup.clone()
        };
        output::token(token.line, token.kind.as_str(), &token.tag, &content);
    }
    Ok(())
}

fn cmd_frontmatter(ctx: &ServiceContainer, file: &Path) -> CliResult<()> {
    let text = read_input(ctx, file)?;
    match extract_frontmatter(&text) {
        Some(yaml) => output::info(&yaml),
        None => output::warning(&format!("no frontmatter in {}", file.display())),
    }
    Ok(())
}

fn cmd_config(ctx: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(ctx.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(path) => output::path_status("global", &path, ctx.fs.exists(&path)),
                None => output::warning("no home directory, global config disabled"),
            }
            let cwd = std::env::current_dir().map_err(|e| {
                crate::infrastructure::InfraError::io("determine working directory", e)
            })?;
            let local = config::local_config_path(&cwd);
            output::path_status("local", &local, ctx.fs.exists(&local));
        }
        ConfigCommands::Template => {
            output::info(Settings::template().trim_end());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                config::global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("no home directory for global config".to_string())
                })?
            } else {
                config::local_config_path(Path::new("."))
            };
            if ctx.fs.exists(&path) {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            ctx.conversion.write_output(&path, &Settings::template())?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}
