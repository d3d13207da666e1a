//! CLI command definitions for nb-config-manager
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::Settings;
use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve notebook frontend config between user and environment directories
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a settings file (overrides the default location)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// User nbconfig directory (overrides settings and discovery)
    #[arg(long, global = true, value_name = "DIR")]
    pub user_dir: Option<PathBuf>,

    /// Environment nbconfig directory (overrides settings and discovery)
    #[arg(long, global = true, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Do not merge extensions from the user config directory
    #[arg(long, global = true)]
    pub disable_user_config: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.user_dir {
            settings.user_config_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.env_dir {
            settings.environment_config_dir = Some(dir.clone());
        }
        if self.disable_user_config {
            settings.disable_user_config = true;
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the active config directory, merging user extensions (default)
    Resolve(ResolveArgs),

    /// Print a section document from the active config directory
    Show(ShowArgs),
}

/// Arguments for the resolve subcommand
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Section name, e.g. notebook, tree, editor
    #[arg(value_name = "SECTION")]
    pub section: String,
}
