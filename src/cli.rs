//! The topchem command-line front end.
//!
//! This module is the main entry point for all CLI commands and wires the
//! library together: options, one shared grammar, the parser, and output.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ParserOptions;
use crate::discovery::discover_topology_files;
use crate::errors::{explain, print_error, TopologyError};
use crate::grammar::Grammar;
use crate::source::SourceFile;
use crate::syntax::parser::TopologyParser;

pub mod args;
pub mod output;

use args::{Command, TopchemArgs};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = TopchemArgs::parse();
    init_logging(args.verbose);

    let options = resolve_options(&args).unwrap_or_else(|e| {
        print_error(&e, false);
        process::exit(2);
    });
    let grammar = Grammar::new().unwrap_or_else(|e| {
        eprintln!("internal error: {e}");
        process::exit(2);
    });
    let parser = TopologyParser::with_options(Arc::new(grammar), options);

    match args.command {
        Command::Check { paths, fancy } => {
            let failed = check(&parser, &paths, fancy);
            if failed > 0 {
                process::exit(1);
            }
        }

        Command::Tree { file, json } => {
            let topology = parser.parse_file(&file).unwrap_or_else(|e| exit_with(&e));
            if json {
                if let Err(e) = output::print_tree_json(&topology) {
                    eprintln!("failed to serialize tree: {e}");
                    process::exit(2);
                }
            } else {
                output::print_tree(&topology);
            }
        }

        Command::Tokens { file } => {
            let tokens = SourceFile::read(&file)
                .and_then(|source| Ok(parser.tokenize(&source.text, &source.label)?))
                .unwrap_or_else(|e| exit_with(&e));
            output::print_tokens(&tokens);
        }

        Command::Explain { terminals } => {
            for terminal in &terminals {
                output::print_explanation(terminal, explain(terminal));
            }
        }
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Parses every topology file under `paths`; returns the number of failures.
fn check(parser: &TopologyParser, paths: &[PathBuf], fancy: bool) -> usize {
    let mut checked = 0;
    let mut failed = 0;

    for root in paths {
        let files = match discover_topology_files(root) {
            Ok(files) => files,
            Err(e) => {
                failed += 1;
                checked += 1;
                output::print_failed(root);
                print_error(&e, fancy);
                continue;
            }
        };

        for file in files {
            checked += 1;
            if !check_file(parser, &file, fancy) {
                failed += 1;
            }
        }
    }

    output::print_summary(checked, failed);
    failed
}

fn check_file(parser: &TopologyParser, file: &Path, fancy: bool) -> bool {
    match parser.parse_file(file) {
        Ok(_) => {
            output::print_ok(file);
            true
        }
        Err(e) => {
            output::print_failed(file);
            print_error(&e, fancy);
            false
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn resolve_options(args: &TopchemArgs) -> Result<ParserOptions, TopologyError> {
    let mut options = match &args.options {
        Some(path) => ParserOptions::from_json_file(path)?,
        None => ParserOptions::default(),
    };
    if let Some(label) = &args.label {
        options = options.with_parser_label(label.clone());
    }
    if let Some(span) = args.span {
        options = options.with_context_span(span);
    }
    Ok(options)
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

fn exit_with(error: &TopologyError) -> ! {
    print_error(error, false);
    process::exit(1);
}
