//! Topchem error handling.
//!
//! A failed parse produces exactly one [`ParseError`]. It carries everything
//! needed to render a self-contained caret diagnostic (see
//! [`ParseError::render`]) and also implements [`miette::Diagnostic`] for
//! callers that prefer graphical reports. Failures around the parser (reading
//! files, loading options, walking directories) are [`TopologyError`]s.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic, LabeledSpan, MietteDiagnostic, NamedSource, Report};
use thiserror::Error;

pub mod context;
pub mod explain;

pub use context::{
    context_window, pointer, visual_width, DEFAULT_CONTEXT_SPAN, DEFAULT_TAB_WIDTH, POINTER_MARKER,
};
pub use explain::explain;

/// Pseudo terminal reported when the input ends in the middle of a line.
pub const END_OF_INPUT: &str = "$END";

const DIAGNOSTIC_CODE: &str = "topchem::parse";

// ============================================================================
// PARSE ERROR
// ============================================================================

/// A structural parse failure: where it happened and what would have been
/// accepted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    source_text: String,
    /// `None` when no position could be determined.
    fail_offset: Option<usize>,
    line: usize,
    column: usize,
    parser_label: String,
    file_label: String,
    /// Raw terminal identifiers, explained only when rendering.
    expected: Vec<String>,
    found: Option<String>,
    context_span: usize,
    tab_width: usize,
}

impl ParseError {
    pub fn new(
        source_text: impl Into<String>,
        fail_offset: Option<usize>,
        line: usize,
        column: usize,
        parser_label: impl Into<String>,
        file_label: impl Into<String>,
        expected: Vec<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            fail_offset,
            line,
            column,
            parser_label: parser_label.into(),
            file_label: file_label.into(),
            expected,
            found: None,
            context_span: DEFAULT_CONTEXT_SPAN,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    /// Records the terminal (or [`END_OF_INPUT`]) met at the failure.
    #[must_use]
    pub fn with_found(mut self, found: Option<String>) -> Self {
        self.found = found;
        self
    }

    /// Span used by `Display`.
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

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn fail_offset(&self) -> Option<usize> {
        self.fail_offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn parser_label(&self) -> &str {
        &self.parser_label
    }

    pub fn file_label(&self) -> &str {
        &self.file_label
    }

    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    pub fn context_span(&self) -> usize {
        self.context_span
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Explanations of the expected terminals, in order.
    pub fn expected_explained(&self) -> impl Iterator<Item = &str> {
        self.expected.iter().map(|id| explain(id))
    }

    /// The context line around the failure and the pointer under it.
    ///
    /// With an unknown offset the context line is empty and the pointer is
    /// the bare marker.
    pub fn context(&self, span: usize) -> (String, String) {
        match self.fail_offset {
            Some(offset) => {
                let (before, after) = context_window(&self.source_text, offset, span);
                (format!("{before}{after}"), pointer(before, self.tab_width))
            }
            None => (String::new(), POINTER_MARKER.to_string()),
        }
    }

    /// First line of the diagnostic.
    pub fn header(&self) -> String {
        format!(
            "{} error while reading {} at line {}, column {}:",
            self.parser_label, self.file_label, self.line, self.column
        )
    }

    /// Formats the full caret diagnostic with `span` characters of context
    /// on each side. Lines are joined by `\n`, without a trailing newline.
    pub fn render(&self, span: usize) -> String {
        let mut message = vec![self.header()];

        if self.fail_offset.is_some() {
            let (context_line, pointer) = self.context(span);
            let line_label = format!("{}: ", self.line);
            message.push(format!("{line_label}{context_line}"));
            message.push(format!("{}{pointer}", " ".repeat(line_label.len())));
        }

        if !self.expected.is_empty() {
            message.push("Expected input:".to_string());
            message.extend(self.expected_explained().map(|entry| format!("- {entry}")));
        }

        message.join("\n")
    }

    fn label_text(&self) -> String {
        match self.found.as_deref() {
            Some(END_OF_INPUT) => "unexpected end of input".to_string(),
            Some(found) => format!("unexpected {found}"),
            None => "unrecognized input".to_string(),
        }
    }

    fn help_text(&self) -> Option<String> {
        if self.expected.is_empty() {
            return None;
        }
        let entries: Vec<&str> = self.expected_explained().collect();
        Some(format!("expected one of:\n  {}", entries.join("\n  ")))
    }

    fn label(&self) -> Option<LabeledSpan> {
        let offset = self.fail_offset?.min(self.source_text.len());
        let len = self.source_text[offset..]
            .chars()
            .next()
            .filter(|ch| *ch != '\n')
            .map_or(0, char::len_utf8);
        Some(LabeledSpan::new(Some(self.label_text()), offset, len))
    }

    /// A graphical report with a one-line message, the failure labelled in
    /// the named source.
    pub fn to_report(&self) -> Report {
        let message = self.header().trim_end_matches(':').to_string();
        let mut diagnostic = MietteDiagnostic::new(message)
            .with_code(DIAGNOSTIC_CODE)
            .with_labels(self.label());
        if let Some(help) = self.help_text() {
            diagnostic = diagnostic.with_help(help);
        }
        Report::new(diagnostic).with_source_code(NamedSource::new(
            self.file_label.clone(),
            self.source_text.clone(),
        ))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(self.context_span))
    }
}

impl std::error::Error for ParseError {}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(DIAGNOSTIC_CODE))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_text()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.label()?;
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_text)
    }
}

// ============================================================================
// COLLABORATOR ERRORS
// ============================================================================

/// Failures of the layers around the parser.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(Box<ParseError>),
    #[error("invalid parser options in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to walk {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl From<ParseError> for TopologyError {
    fn from(error: ParseError) -> Self {
        TopologyError::Parse(Box::new(error))
    }
}

impl TopologyError {
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            TopologyError::Parse(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl Diagnostic for TopologyError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            TopologyError::Parse(error) => error.code(),
            TopologyError::Io { .. } => Some(Box::new("topchem::io")),
            TopologyError::Config { .. } => Some(Box::new("topchem::config")),
            TopologyError::Discovery { .. } => Some(Box::new("topchem::discovery")),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.as_parse_error().and_then(|error| error.help())
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.as_parse_error().and_then(|error| error.labels())
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.as_parse_error().and_then(|error| error.source_code())
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error to stderr: parse failures as a graphical report when
/// `fancy` is set, everything else through its `Display`.
pub fn print_error(error: &TopologyError, fancy: bool) {
    match error.as_parse_error() {
        Some(parse_error) if fancy => eprintln!("{:?}", parse_error.to_report()),
        _ => eprintln!("{error}"),
    }
}
