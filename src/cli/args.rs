//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report test classes with missing or wrong coverage attributes
//! - `fix`: Rewrite coverage attributes (dry-run unless `--apply`)
//! - `resolve`: Print the class a test class covers
//! - `init`: Initialize covfix configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

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
            Some(Command::Fix(cmd)) => cmd.args.common.verbose,
            Some(Command::Resolve(_)) | Some(Command::Init) | Some(Command::Serve) | None => {
                false
            }
        }
    }
}

/// Common arguments shared by commands that scan a project.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project directory or single PHP file to check
    #[arg(default_value = ".")]
    pub path: PathBuf,

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
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Parser)]
pub struct FixArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually rewrite files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub args: FixArgs,
}

#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Fully qualified test class name, e.g. Tests\Unit\Services\FooTest
    pub class_name: String,

    /// Directory to load .covfixrc.json from
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check test classes for missing or wrong CoversClass/CoversMethod attributes
    Check(CheckCommand),
    /// Rewrite CoversClass/CoversMethod attributes to match the tested class
    Fix(FixCommand),
    /// Print the class (and method) a test class covers
    Resolve(ResolveCommand),
    /// Initialize a new .covfixrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
