//! Command line argument definitions.

use crate::core::persistence::DEFAULT_PLAN_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bt-rename - Rename downloaded episodes and subtitles with AI
#[derive(Parser, Debug)]
#[command(name = "bt-rename")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug trace output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan renames with TMDB and AI, then apply them
    ///
    /// Reads newline-separated paths from stdin when no directory is given.
    Rename {
        /// Directories to discover files in
        #[arg(value_name = "DIR")]
        dirs: Vec<PathBuf>,

        /// Dry run - write the plan but do not rename anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Search TMDB with these terms instead of the directory name
        #[arg(short, long, value_name = "TERMS")]
        search: Vec<String>,

        /// Abort unless at least one subtitle file is among the candidates
        #[arg(long)]
        require_subtitles: bool,

        /// Do not ask for confirmation before renaming
        #[arg(short, long)]
        yes: bool,

        /// Maximum directory depth to discover (overrides config)
        #[arg(long, value_name = "DEPTH")]
        max_depth: Option<usize>,
    },

    /// Execute an existing plan file, then archive it
    Apply {
        /// Path to the plan file
        #[arg(value_name = "PLAN_FILE", default_value = DEFAULT_PLAN_FILE)]
        plan_file: PathBuf,
    },

    /// Move files back using an archived plan file
    Undo {
        /// Path to the archived plan file
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Dry run - show what would be moved back
        #[arg(long)]
        dry_run: bool,
    },
}
