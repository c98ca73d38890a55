//! Parser options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{TopologyError, DEFAULT_CONTEXT_SPAN, DEFAULT_TAB_WIDTH};

pub const DEFAULT_PARSER_LABEL: &str = "Topology Parser";

/// Settings attached to a parser handle and recorded in every
/// [`ParseError`](crate::ParseError) it produces.
///
/// Missing fields take their defaults, so `{}` is a valid options file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Leads the diagnostic header.
    pub parser_label: String,
    /// Characters of context shown on each side of a failure.
    pub context_span: usize,
    /// Tab stop used to align the pointer.
    pub tab_width: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            parser_label: DEFAULT_PARSER_LABEL.to_string(),
            context_span: DEFAULT_CONTEXT_SPAN,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl ParserOptions {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| TopologyError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_parser_label(mut self, label: impl Into<String>) -> Self {
        self.parser_label = label.into();
        self
    }

    #[must_use]
    pub fn with_context_span(mut self, span: usize) -> Self {
        self.context_span = span;
        self
    }

    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let options = ParserOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ParserOptions::default());
        assert_eq!(options.parser_label, "Topology Parser");
        assert_eq!(options.context_span, 60);
        assert_eq!(options.tab_width, 8);
    }

    #[test]
    fn test_partial_override() {
        let options = ParserOptions::from_json_str(r#"{"tab_width": 4}"#).unwrap();
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.context_span, 60);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(ParserOptions::from_json_str(r#"{"tab_width": "wide"}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ParserOptions::from_json_file("/nonexistent/topchem/options.json").unwrap_err();
        assert!(matches!(err, TopologyError::Io { .. }));
    }
}
