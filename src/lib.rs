//! Grammar-driven parser for unpreprocessed GROMACS topology files.
//!
//! Topology text is read line by line into a flat [`Topology`] tree of line
//! comments, preprocessor directives (recognized, never executed), section
//! headers, and data entries. Failures are reported as a single
//! [`ParseError`] that renders a caret diagnostic explaining which input
//! would have been accepted.
//!
//! ```
//! use std::sync::Arc;
//! use topchem::{Grammar, SyntaxNode, TopologyParser};
//!
//! let parser = TopologyParser::new(Arc::new(Grammar::new().unwrap()));
//! let topology = parser.parse("[ atoms ]\n1 CT\n", "topol.top").unwrap();
//! assert!(matches!(topology.children[0], SyntaxNode::SectionHeader(_)));
//!
//! let error = parser.parse("[ atoms\n", "topol.top").unwrap_err();
//! assert_eq!(error.expected(), ["RSQB"]);
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod grammar;
pub mod source;
pub mod syntax;

pub use config::ParserOptions;
pub use discovery::discover_topology_files;
pub use errors::{explain, ParseError, TopologyError};
pub use grammar::{Grammar, GrammarError, TerminalKind, TerminalSet};
pub use source::SourceFile;
pub use syntax::parser::{parse, TopologyParser};
pub use syntax::{
    DirectiveKind, Entry, LineComment, PreprocessorDirective, SectionHeader, SyntaxNode, Token,
    Topology,
};
