//! Terminal identifiers, recognition rules, and terminal sets.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::syntax::DirectiveKind;

/// Every terminal of the topology grammar, in enumeration order.
///
/// The declaration order is significant: expected-terminal lists are always
/// reported in this order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerminalKind {
    #[serde(rename = "_INCLUDE")]
    Include,
    #[serde(rename = "_DEFINE")]
    Define,
    #[serde(rename = "_UNDEF")]
    Undef,
    #[serde(rename = "_IFDEF")]
    Ifdef,
    #[serde(rename = "_IFNDEF")]
    Ifndef,
    #[serde(rename = "_ELSE")]
    Else,
    #[serde(rename = "_ENDIF")]
    Endif,
    #[serde(rename = "PPCOMMENT")]
    PpComment,
    #[serde(rename = "COMMENT")]
    Comment,
    #[serde(rename = "LSQB")]
    Lsqb,
    #[serde(rename = "RSQB")]
    Rsqb,
    #[serde(rename = "SIGNED_FLOAT")]
    SignedFloat,
    #[serde(rename = "SIGNED_INT")]
    SignedInt,
    #[serde(rename = "CNAME")]
    Cname,
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "PATH")]
    Path,
    #[serde(rename = "_NEWLINE")]
    Newline,
}

impl TerminalKind {
    pub const COUNT: usize = 17;

    pub const ALL: [TerminalKind; TerminalKind::COUNT] = [
        TerminalKind::Include,
        TerminalKind::Define,
        TerminalKind::Undef,
        TerminalKind::Ifdef,
        TerminalKind::Ifndef,
        TerminalKind::Else,
        TerminalKind::Endif,
        TerminalKind::PpComment,
        TerminalKind::Comment,
        TerminalKind::Lsqb,
        TerminalKind::Rsqb,
        TerminalKind::SignedFloat,
        TerminalKind::SignedInt,
        TerminalKind::Cname,
        TerminalKind::Id,
        TerminalKind::Path,
        TerminalKind::Newline,
    ];

    /// The raw terminal identifier (`SIGNED_INT`, `LSQB`, `_NEWLINE`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            TerminalKind::Include => "_INCLUDE",
            TerminalKind::Define => "_DEFINE",
            TerminalKind::Undef => "_UNDEF",
            TerminalKind::Ifdef => "_IFDEF",
            TerminalKind::Ifndef => "_IFNDEF",
            TerminalKind::Else => "_ELSE",
            TerminalKind::Endif => "_ENDIF",
            TerminalKind::PpComment => "PPCOMMENT",
            TerminalKind::Comment => "COMMENT",
            TerminalKind::Lsqb => "LSQB",
            TerminalKind::Rsqb => "RSQB",
            TerminalKind::SignedFloat => "SIGNED_FLOAT",
            TerminalKind::SignedInt => "SIGNED_INT",
            TerminalKind::Cname => "CNAME",
            TerminalKind::Id => "ID",
            TerminalKind::Path => "PATH",
            TerminalKind::Newline => "_NEWLINE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Position in the enumeration order.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn directive_kind(self) -> Option<DirectiveKind> {
        match self {
            TerminalKind::Include => Some(DirectiveKind::Include),
            TerminalKind::Define => Some(DirectiveKind::Define),
            TerminalKind::Undef => Some(DirectiveKind::Undef),
            TerminalKind::Ifdef => Some(DirectiveKind::Ifdef),
            TerminalKind::Ifndef => Some(DirectiveKind::Ifndef),
            TerminalKind::Else => Some(DirectiveKind::Else),
            TerminalKind::Endif => Some(DirectiveKind::Endif),
            _ => None,
        }
    }

    pub const fn is_comment(self) -> bool {
        matches!(self, TerminalKind::Comment | TerminalKind::PpComment)
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of terminals, iterated in enumeration order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct TerminalSet(u32);

impl TerminalSet {
    pub const EMPTY: TerminalSet = TerminalSet(0);

    pub const fn all() -> Self {
        TerminalSet((1 << TerminalKind::COUNT) - 1)
    }

    pub const fn of(kinds: &[TerminalKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i].index();
            i += 1;
        }
        TerminalSet(bits)
    }

    #[must_use]
    pub const fn with(self, kind: TerminalKind) -> Self {
        TerminalSet(self.0 | 1 << kind.index())
    }

    pub const fn contains(self, kind: TerminalKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TerminalKind> {
        TerminalKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }

    /// Raw identifiers of the members, in enumeration order.
    pub fn names(self) -> Vec<String> {
        self.iter().map(|kind| kind.name().to_string()).collect()
    }
}

impl fmt::Debug for TerminalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// How a terminal recognizes its text at the start of the remaining input.
#[derive(Clone)]
pub(crate) enum Matcher {
    Literal(&'static str),
    /// An expression compiled with a leading `^` anchor.
    Pattern(Regex),
    Scan(fn(&str) -> Option<usize>),
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Matcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Matcher::Scan(_) => f.write_str("Scan"),
        }
    }
}

impl Matcher {
    pub(crate) fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{source})")).map(Matcher::Pattern)
    }

    /// Length in bytes of the match at the start of `rest`, if non-empty.
    fn match_len(&self, rest: &str) -> Option<usize> {
        let len = match self {
            Matcher::Literal(literal) => rest.starts_with(literal).then_some(literal.len()),
            Matcher::Pattern(regex) => regex.find(rest).map(|m| m.end()),
            Matcher::Scan(scan) => scan(rest),
        }?;
        (len > 0).then_some(len)
    }
}

/// A terminal definition: identifier, recognition rule, and tie-break priority.
#[derive(Debug, Clone)]
pub struct Terminal {
    kind: TerminalKind,
    matcher: Matcher,
    priority: u8,
}

impl Terminal {
    pub(crate) fn new(kind: TerminalKind, matcher: Matcher, priority: u8) -> Self {
        Self {
            kind,
            matcher,
            priority,
        }
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Length in bytes of this terminal's match at the start of `rest`.
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        self.matcher.match_len(rest)
    }
}

/// Preprocessor comment: `//` to end of line, or a `/* */` block.
///
/// A block left open runs to the end of input, stopping short of a final
/// line break so that break still closes the logical line.
pub(crate) fn scan_pp_comment(rest: &str) -> Option<usize> {
    if rest.starts_with("//") {
        return Some(rest.find(['\r', '\n']).unwrap_or(rest.len()));
    }
    let body = rest.strip_prefix("/*")?;
    match body.find("*/") {
        Some(end) => Some(2 + end + 2),
        None => {
            let open = rest
                .strip_suffix('\n')
                .map(|r| r.strip_suffix('\r').unwrap_or(r))
                .unwrap_or(rest);
            Some(open.len())
        }
    }
}

/// Directive argument: a run of non-blank characters other than `;`.
///
/// A backslash joins the run only when a non-blank character follows it,
/// and the run stops in front of `//` or `/*`.
pub(crate) fn scan_path(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        match c {
            ';' => return Some(i),
            c if c.is_whitespace() => return Some(i),
            '\\' => match next {
                Some(escaped) if !escaped.is_whitespace() => {
                    chars.next();
                }
                _ => return Some(i),
            },
            '/' if matches!(next, Some('/' | '*')) => return Some(i),
            _ => {}
        }
    }
    Some(rest.len())
}

/// True when a `PPCOMMENT` token is a block comment without its `*/`.
pub fn is_unterminated_block(text: &str) -> bool {
    text.starts_with("/*") && !(text.len() >= 4 && text.ends_with("*/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_iterates_in_enumeration_order() {
        let set = TerminalSet::of(&[TerminalKind::Newline, TerminalKind::Rsqb, TerminalKind::Include]);
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(
            kinds,
            [TerminalKind::Include, TerminalKind::Rsqb, TerminalKind::Newline]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_all_contains_every_kind() {
        let all = TerminalSet::all();
        assert_eq!(all.len(), TerminalKind::COUNT);
        assert!(TerminalKind::ALL.iter().all(|k| all.contains(*k)));
    }

    #[test]
    fn test_names_are_unique_and_resolvable() {
        for kind in TerminalKind::ALL {
            assert_eq!(TerminalKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TerminalKind::from_name("$END"), None);
    }

    #[test]
    fn test_pp_comment_line_form_stops_before_line_break() {
        assert_eq!(scan_pp_comment("// note\r\nrest"), Some(7));
        assert_eq!(scan_pp_comment("//"), Some(2));
    }

    #[test]
    fn test_pp_comment_block_spans_lines() {
        let text = "/* a\n b */ 1\n";
        assert_eq!(scan_pp_comment(text), Some(10));
    }

    #[test]
    fn test_path_stops_in_front_of_comment_openers() {
        assert_eq!(scan_path("\"a.itp\"// c\n"), Some(7));
        assert_eq!(scan_path("a/*b*/"), Some(1));
        assert_eq!(scan_path("/* c */"), Some(0));
        assert_eq!(scan_path("ff/amber.ff/ x"), Some(12));
        assert_eq!(scan_path("a\\ b\\x"), Some(1));
        assert_eq!(scan_path("a\\xb;c"), Some(4));
        assert_eq!(scan_path("dir/"), Some(4));
    }

    #[test]
    fn test_unterminated_block_keeps_final_line_break() {
        let text = "/* open\nstill open\n";
        let len = scan_pp_comment(text).unwrap();
        assert_eq!(&text[..len], "/* open\nstill open");
        assert!(is_unterminated_block(&text[..len]));
        assert!(!is_unterminated_block("/**/"));
        assert!(is_unterminated_block("/*/"));
    }

    #[test]
    fn test_serialized_name_matches_identifier() {
        let json = serde_json::to_string(&TerminalKind::SignedInt).unwrap();
        assert_eq!(json, "\"SIGNED_INT\"");
    }
}
