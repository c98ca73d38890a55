//! Syntax tree for unpreprocessed topology files.
//!
//! The tree mirrors the line structure of a `.top`/`.itp` file: every logical
//! line becomes at most one [`SyntaxNode`] under the [`Topology`] root. Tokens
//! keep their source text together with the byte offset, line, and column they
//! were read from, so any node can be mapped back to the source text.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::grammar::TerminalKind;

pub mod lexer;
pub mod parser;

/// Represents a span in the source code (byte offsets, end exclusive).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Returns a span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A location in the input: byte offset plus 1-based line and column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of an input.
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// A classified slice of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub terminal: TerminalKind,
    pub text: String,
    pub start_offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Byte offset one past the last byte of the token.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.start_offset,
            end: self.end_offset(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.start_offset,
            line: self.line,
            column: self.column,
        }
    }

    /// True for `;` topology comments and `//`, `/* */` preprocessor comments.
    pub fn is_comment(&self) -> bool {
        self.terminal.is_comment()
    }
}

/// The preprocessor directives recognized (but never executed) by the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveKind {
    Include,
    Define,
    Undef,
    Ifdef,
    Ifndef,
    Else,
    Endif,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::Include,
        DirectiveKind::Define,
        DirectiveKind::Undef,
        DirectiveKind::Ifdef,
        DirectiveKind::Ifndef,
        DirectiveKind::Else,
        DirectiveKind::Endif,
    ];

    /// The directive keyword as written in a topology file.
    pub const fn keyword(self) -> &'static str {
        match self {
            DirectiveKind::Include => "#include",
            DirectiveKind::Define => "#define",
            DirectiveKind::Undef => "#undef",
            DirectiveKind::Ifdef => "#ifdef",
            DirectiveKind::Ifndef => "#ifndef",
            DirectiveKind::Else => "#else",
            DirectiveKind::Endif => "#endif",
        }
    }

    /// The grammar terminal recognizing this keyword.
    pub const fn terminal(self) -> TerminalKind {
        match self {
            DirectiveKind::Include => TerminalKind::Include,
            DirectiveKind::Define => TerminalKind::Define,
            DirectiveKind::Undef => TerminalKind::Undef,
            DirectiveKind::Ifdef => TerminalKind::Ifdef,
            DirectiveKind::Ifndef => TerminalKind::Ifndef,
            DirectiveKind::Else => TerminalKind::Else,
            DirectiveKind::Endif => TerminalKind::Endif,
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A comment occupying its own line (`;` or a preprocessor comment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineComment {
    pub token: Token,
}

/// A preprocessor directive with its raw, unexpanded trailing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessorDirective {
    pub kind: DirectiveKind,
    pub keyword: Token,
    pub content_tokens: Vec<Token>,
}

impl PreprocessorDirective {
    /// Content tokens that are not comments (the directive arguments).
    pub fn arguments(&self) -> impl Iterator<Item = &Token> {
        self.content_tokens.iter().filter(|t| !t.is_comment())
    }
}

/// `[ name ]`, with any comments trailing the closing bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub name_token: Token,
    pub comments: Vec<Token>,
}

impl SectionHeader {
    pub fn name(&self) -> &str {
        &self.name_token.text
    }
}

/// One logical data line. The tokens are opaque: numbers and names are not
/// interpreted, inline and trailing comments are kept in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub tokens: Vec<Token>,
}

impl Entry {
    /// Entry tokens without the comments.
    pub fn values(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.is_comment())
    }
}

/// A node directly under the [`Topology`] root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SyntaxNode {
    LineComment(LineComment),
    PreprocessorDirective(PreprocessorDirective),
    SectionHeader(SectionHeader),
    Entry(Entry),
}

impl SyntaxNode {
    /// All tokens of the node in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        match self {
            SyntaxNode::LineComment(comment) => vec![&comment.token],
            SyntaxNode::PreprocessorDirective(directive) => std::iter::once(&directive.keyword)
                .chain(directive.content_tokens.iter())
                .collect(),
            SyntaxNode::SectionHeader(header) => std::iter::once(&header.name_token)
                .chain(header.comments.iter())
                .collect(),
            SyntaxNode::Entry(entry) => entry.tokens.iter().collect(),
        }
    }

    /// The span from the first to the last token of the node.
    pub fn span(&self) -> Span {
        let tokens = self.tokens();
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::default(),
        }
    }

    /// Returns the rule name of this node, as used by [`Topology::pretty`].
    pub fn type_name(&self) -> &'static str {
        match self {
            SyntaxNode::LineComment(_) => "line_comment",
            SyntaxNode::PreprocessorDirective(directive) => match directive.kind {
                DirectiveKind::Include => "include",
                DirectiveKind::Define => "define",
                DirectiveKind::Undef => "undef",
                DirectiveKind::Ifdef => "ifdef",
                DirectiveKind::Ifndef => "ifndef",
                DirectiveKind::Else => "else",
                DirectiveKind::Endif => "endif",
            },
            SyntaxNode::SectionHeader(_) => "section_header",
            SyntaxNode::Entry(_) => "entry",
        }
    }

    fn leaf_tokens(&self) -> Vec<&Token> {
        match self {
            SyntaxNode::PreprocessorDirective(directive) => {
                directive.content_tokens.iter().collect()
            }
            _ => self.tokens(),
        }
    }
}

/// Root of the syntax tree; children are in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topology {
    pub children: Vec<SyntaxNode>,
}

impl Topology {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxNode> {
        self.children.iter()
    }

    /// Every token held by the tree, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().flat_map(|node| node.tokens())
    }

    /// Names of all section headers in order of appearance.
    pub fn section_names(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter_map(|node| match node {
                SyntaxNode::SectionHeader(header) => Some(header.name()),
                _ => None,
            })
            .collect()
    }

    /// Pretty-prints the tree, one node per line with tab separated tokens.
    pub fn pretty(&self) -> String {
        let mut out = String::from("topology\n");
        for node in &self.children {
            out.push_str("  ");
            out.push_str(node.type_name());
            for token in node.leaf_tokens() {
                out.push('\t');
                out.push_str(&escape_layout(&token.text));
            }
            out.push('\n');
        }
        out
    }
}

fn escape_layout(text: &str) -> String {
    text.replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

impl<'a> IntoIterator for &'a Topology {
    type Item = &'a SyntaxNode;
    type IntoIter = std::slice::Iter<'a, SyntaxNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(terminal: TerminalKind, text: &str, start_offset: usize, column: usize) -> Token {
        Token {
            terminal,
            text: text.to_string(),
            start_offset,
            line: 1,
            column,
        }
    }

    #[test]
    fn test_entry_values_skip_comments() {
        let entry = Entry {
            tokens: vec![
                token(TerminalKind::SignedInt, "1", 0, 1),
                token(TerminalKind::Cname, "CT", 2, 3),
                token(TerminalKind::Comment, "; carbon", 5, 6),
            ],
        };
        let values: Vec<_> = entry.values().map(|t| t.text.as_str()).collect();
        assert_eq!(values, ["1", "CT"]);
    }

    #[test]
    fn test_node_span_covers_all_tokens() {
        let node = SyntaxNode::Entry(Entry {
            tokens: vec![
                token(TerminalKind::SignedInt, "1", 0, 1),
                token(TerminalKind::Cname, "CT", 2, 3),
            ],
        });
        assert_eq!(node.span(), Span { start: 0, end: 4 });
    }

    #[test]
    fn test_pretty_lists_directive_content_only() {
        let topology = Topology {
            children: vec![SyntaxNode::PreprocessorDirective(PreprocessorDirective {
                kind: DirectiveKind::Include,
                keyword: token(TerminalKind::Include, "#include", 0, 1),
                content_tokens: vec![token(TerminalKind::Path, "\"x.itp\"", 9, 10)],
            })],
        };
        assert_eq!(topology.pretty(), "topology\n  include\t\"x.itp\"\n");
    }

    #[test]
    fn test_directive_keywords_round_trip_terminals() {
        for kind in DirectiveKind::ALL {
            assert_eq!(kind.terminal().directive_kind(), Some(kind));
            assert_eq!(kind.terminal().name().to_lowercase(), format!("_{}", &kind.keyword()[1..]));
        }
    }
}
