//! Defines the command-line arguments and subcommands for the topchem CLI.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "topchem",
    version,
    about = "Parse unpreprocessed GROMACS topology files and explain syntax errors."
)]
pub struct TopchemArgs {
    /// JSON file with parser options.
    #[arg(long, global = true, value_name = "JSON FILE")]
    pub options: Option<PathBuf>,

    /// Parser label shown at the start of diagnostics.
    #[arg(long, global = true)]
    pub label: Option<String>,

    /// Characters of context shown around a failure.
    #[arg(long, global = true)]
    pub span: Option<usize>,

    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse topology files and report the first error in each.
    Check {
        /// Files or directories (searched for .top and .itp files).
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print graphical reports instead of caret diagnostics.
        #[arg(long)]
        fancy: bool,
    },
    /// Print the syntax tree of a topology file.
    Tree {
        #[arg(required = true)]
        file: PathBuf,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print every token of a topology file with its position.
    Tokens {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Describe grammar terminals.
    Explain {
        /// Terminal identifiers such as SIGNED_INT or _NEWLINE.
        #[arg(required = true)]
        terminals: Vec<String>,
    },
}
