//! Topology Parser - table-driven, one token of lookahead.
//!
//! The parser walks the grammar's transition table: in each [`LineState`] it
//! asks the lexer for one of the acceptable terminals, applies the single
//! transition for that terminal, and moves on. Nothing is ever undone, so the
//! first mismatch is the reported failure.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::ParserOptions;
use crate::errors::{ParseError, TopologyError, END_OF_INPUT};
use crate::grammar::{Action, Grammar, LineState, Transition};
use crate::source::SourceFile;
use crate::syntax::lexer::{LexMiss, Lexer};
use crate::syntax::{
    DirectiveKind, Entry, LineComment, Position, PreprocessorDirective, SectionHeader, SyntaxNode,
    Token, Topology,
};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses `text` (which must end with a line break) with default options.
pub fn parse(grammar: &Grammar, text: &str, file_label: &str) -> Result<Topology, ParseError> {
    build_tree(grammar, &ParserOptions::default(), text, file_label)
}

/// A parser handle: a shared grammar plus the options recorded in errors.
///
/// Handles are cheap to clone and may be used from several threads at once.
#[derive(Debug, Clone)]
pub struct TopologyParser {
    grammar: Arc<Grammar>,
    options: ParserOptions,
}

impl TopologyParser {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self::with_options(grammar, ParserOptions::default())
    }

    pub fn with_options(grammar: Arc<Grammar>, options: ParserOptions) -> Self {
        Self { grammar, options }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `text` (which must end with a line break) into a tree.
    pub fn parse(&self, text: &str, file_label: &str) -> Result<Topology, ParseError> {
        build_tree(&self.grammar, &self.options, text, file_label)
    }

    /// Every token the parser reads, line breaks and brackets included.
    pub fn tokenize(&self, text: &str, file_label: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        drive(&self.grammar, &self.options, text, file_label, |token, _| tokens.push(token))?;
        Ok(tokens)
    }

    pub fn parse_source(&self, source: &SourceFile) -> Result<Topology, ParseError> {
        self.parse(&source.text, &source.label)
    }

    /// Reads and parses a file, labelling diagnostics with its path.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Topology, TopologyError> {
        let source = SourceFile::read(path)?;
        Ok(self.parse_source(&source)?)
    }
}

// ============================================================================
// DRIVER
// ============================================================================

fn build_tree(
    grammar: &Grammar,
    options: &ParserOptions,
    text: &str,
    file_label: &str,
) -> Result<Topology, ParseError> {
    let mut builder = TreeBuilder::default();
    drive(grammar, options, text, file_label, |token, transition| {
        builder.apply(token, transition.action)
    })?;
    Ok(builder.finish(file_label, text.len()))
}

fn drive(
    grammar: &Grammar,
    options: &ParserOptions,
    text: &str,
    file_label: &str,
    mut on_token: impl FnMut(Token, Transition),
) -> Result<(), ParseError> {
    let mut lexer = Lexer::new(grammar, text);
    let mut state = LineState::LineStart;

    loop {
        let acceptable = grammar.acceptable(state);
        let token = match lexer.next_token(acceptable) {
            Ok(Some(token)) => token,
            Ok(None) if state == LineState::LineStart => return Ok(()),
            Ok(None) => {
                let miss = LexMiss {
                    position: lexer.position(),
                    found: None,
                    expected: acceptable,
                };
                return Err(failure(options, text, file_label, &miss, Some(END_OF_INPUT)));
            }
            Err(miss) => {
                let found = miss.found.map(|kind| kind.name());
                return Err(failure(options, text, file_label, &miss, found));
            }
        };

        // Acceptable terminals always have a transition.
        let Some(transition) = grammar.transition(state, token.terminal) else {
            let miss = LexMiss {
                position: token.position(),
                found: Some(token.terminal),
                expected: acceptable,
            };
            return Err(failure(options, text, file_label, &miss, Some(token.terminal.name())));
        };
        state = transition.next;
        on_token(token, transition);
    }
}

fn failure(
    options: &ParserOptions,
    text: &str,
    file_label: &str,
    miss: &LexMiss,
    found: Option<&str>,
) -> ParseError {
    let Position {
        offset,
        line,
        column,
    } = miss.position;
    let expected = miss.expected.names();
    debug!(
        file = file_label,
        line,
        column,
        found = found.unwrap_or("<unrecognized>"),
        expected = ?expected,
        "parse failed"
    );
    ParseError::new(
        text,
        Some(offset),
        line,
        column,
        options.parser_label.as_str(),
        file_label,
        expected,
    )
    .with_found(found.map(str::to_string))
    .with_context_span(options.context_span)
    .with_tab_width(options.tab_width)
}

// ============================================================================
// TREE BUILDING
// ============================================================================

/// The node of the current line, while its tokens are being read.
#[derive(Debug)]
enum PendingNode {
    Comment(Token),
    Directive {
        kind: DirectiveKind,
        keyword: Token,
        content: Vec<Token>,
    },
    Header {
        name: Token,
        comments: Vec<Token>,
    },
    Entry(Vec<Token>),
}

impl PendingNode {
    fn push(&mut self, token: Token) {
        match self {
            PendingNode::Directive { content, .. } => content.push(token),
            PendingNode::Header { comments, .. } => comments.push(token),
            PendingNode::Entry(tokens) => tokens.push(token),
            PendingNode::Comment(_) => {
                debug_assert!(false, "line comments take no further tokens")
            }
        }
    }

    fn into_node(self) -> SyntaxNode {
        match self {
            PendingNode::Comment(token) => SyntaxNode::LineComment(LineComment { token }),
            PendingNode::Directive {
                kind,
                keyword,
                content,
            } => SyntaxNode::PreprocessorDirective(PreprocessorDirective {
                kind,
                keyword,
                content_tokens: content,
            }),
            PendingNode::Header { name, comments } => SyntaxNode::SectionHeader(SectionHeader {
                name_token: name,
                comments,
            }),
            PendingNode::Entry(tokens) => SyntaxNode::Entry(Entry { tokens }),
        }
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    children: Vec<SyntaxNode>,
    pending: Option<PendingNode>,
}

impl TreeBuilder {
    fn apply(&mut self, token: Token, action: Action) {
        match action {
            Action::BlankLine | Action::Consume => {}
            Action::BeginComment => self.begin(PendingNode::Comment(token)),
            Action::BeginDirective(kind) => self.begin(PendingNode::Directive {
                kind,
                keyword: token,
                content: Vec::new(),
            }),
            Action::BeginHeader => self.begin(PendingNode::Header {
                name: token,
                comments: Vec::new(),
            }),
            Action::BeginEntry => self.begin(PendingNode::Entry(vec![token])),
            Action::Append => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.push(token);
                }
            }
            Action::Finish => self.close(),
        }
    }

    /// A leading block comment is closed by whatever node follows it.
    fn begin(&mut self, node: PendingNode) {
        self.close();
        self.pending = Some(node);
    }

    fn close(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.children.push(pending.into_node());
        }
    }

    fn finish(self, file_label: &str, len: usize) -> Topology {
        debug!(file = file_label, bytes = len, nodes = self.children.len(), "parsed topology");
        Topology {
            children: self.children,
        }
    }
}
