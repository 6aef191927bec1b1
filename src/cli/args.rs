//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all
//! themelint commands, using clap's derive API.
//!
//! ## Commands
//!
//! - `check`: Scan the theme and report conformance findings
//! - `init`: Initialize a themelint configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use super::commands::check::CheckCategory;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Theme root directory
    #[arg(long, default_value = ".")]
    pub theme_root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Rule categories to check (default: all)
    #[arg(value_enum)]
    pub categories: Vec<CheckCategory>,
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the theme for conformance issues (forbidden functions, missing
    /// escaping, deprecated APIs, missing required features)
    Check(CheckCommand),
    /// Initialize a new .themelintrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
