//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Repository Atlas - a portable catalog of your git repositories
#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "ATLAS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Find every repository below ROOT and record it in the index
    Index {
        /// Directory to search
        root: PathBuf,

        /// Index file (default: ROOT/workspaces.ttl)
        #[arg(short, long)]
        index: Option<PathBuf>,
    },

    /// Refresh the remotes of the repositories in the index
    Scan {
        /// Root directory the index describes
        root: PathBuf,

        /// Index file (default: ROOT/workspaces.ttl)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Search ROOT for repositories instead of re-reading the index
        #[arg(short, long)]
        discover: bool,

        /// Run `git fetch --all` in every repository first
        #[arg(long)]
        fetch: bool,
    },

    /// Show the repositories in the index with their status
    ///
    /// Inside the root only the repositories below the current directory
    /// are shown.
    List {
        /// Root directory (default: directory of the index)
        root: Option<PathBuf>,

        /// Index file (default: searched from the current directory upwards)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long, conflicts_with = "plain")]
        json: bool,

        /// Only print repository paths, without querying git
        #[arg(long)]
        plain: bool,
    },

    /// Clone repositories from the index
    ///
    /// Examples:
    ///   atlas clone space/simpsons             # One repository, relative to the current directory
    ///   atlas clone --all -r ~/work -i ws.ttl  # Restore a whole workspace from a backup index
    Clone {
        /// Repository to clone, as a path relative to the current directory
        repository: Option<PathBuf>,

        /// Clone every repository in the index
        #[arg(long)]
        all: bool,

        /// Root directory to clone into (default: directory of the index)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Index file (default: searched from the current directory upwards)
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
}
