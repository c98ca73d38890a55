//! Topology text loaded for parsing.

use std::path::Path;

use crate::errors::TopologyError;

/// Text to parse together with the label used in diagnostics.
///
/// The text always ends with a line break, which the grammar needs to close
/// the final line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub label: String,
    pub text: String,
}

impl SourceFile {
    /// Reads a UTF-8 file; the label is the path as given.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_string(path.to_string_lossy(), text))
    }

    pub fn from_string(label: impl Into<String>, text: impl Into<String>) -> Self {
        let mut text = text.into();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Self {
            label: label.into(),
            text,
        }
    }
}
