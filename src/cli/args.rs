//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Convert heading-structured markdown workbooks to JSON trees and back
#[derive(Parser, Debug)]
#[command(name = "sheetmd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Increase log level (-d info, -dd debug, -ddd trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the command depends on the loaded settings. Commands that do
    /// not can still run, with defaults, when a config file fails to load.
    pub fn requires_settings(&self) -> bool {
        match &self.command {
            Some(Commands::Completion { .. }) | None => false,
            Some(Commands::Config { command }) => matches!(command, ConfigCommands::Show),
            Some(_) => true,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a markdown workbook to JSON
    ToJson {
        /// Markdown input
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Keep tag/markup bookkeeping fields
        #[arg(long)]
        raw: bool,
    },

    /// Convert a workbook JSON document to markdown
    ToMd {
        /// JSON input
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// YAML file (or fenced document) to prepend as frontmatter
        #[arg(long, value_hint = ValueHint::FilePath)]
        frontmatter: Option<PathBuf>,
    },

    /// Create an empty workbook
    New {
        /// Target folder (default: configured folder)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        folder: Option<PathBuf>,
        /// Filename (default: prefix + timestamp)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the heading tree of a document
    Outline {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Dump the token stream of a document
    Tokens {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the YAML frontmatter of a document
    Frontmatter {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a config template
    Template,

    /// Write the config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
