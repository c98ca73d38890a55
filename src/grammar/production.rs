//! Productions of the topology grammar, compiled into a state table.
//!
//! ```text
//! topology       := (PPCOMMENT* line? _NEWLINE)*
//! line           := COMMENT | pp_directive | section_header | entry
//! pp_directive   := KEYWORD PPCOMMENT* PATH (PATH | PPCOMMENT)* COMMENT?   (#include .. #ifndef)
//!                 | KEYWORD (PATH | PPCOMMENT)* COMMENT?                  (#else, #endif)
//! section_header := LSQB (CNAME | ID) RSQB PPCOMMENT* COMMENT?
//! entry          := VALUE (VALUE | PPCOMMENT)* COMMENT?
//! VALUE          := SIGNED_FLOAT | SIGNED_INT | CNAME | ID
//! ```
//!
//! A comment that opens a line is a `line_comment` node of its own, and so
//! is every comment following a leading block comment. Every alternative is
//! decided by its first token, so a single token of lookahead is enough and
//! no production is ever undone.

use super::terminal::{TerminalKind, TerminalSet};
use crate::syntax::DirectiveKind;

/// Where the parser is within the current logical line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LineState {
    /// Between lines; end of input is accepted here.
    LineStart,
    /// After a keyword that needs an argument.
    DirectiveArgument,
    DirectiveBody,
    /// After `[`.
    HeaderOpen,
    /// After the section name.
    HeaderName,
    /// After `]`.
    HeaderClose,
    EntryBody,
    /// Only the line break may follow.
    LineEnd,
    /// After a block comment that opened the line.
    CommentTail,
}

impl LineState {
    pub const COUNT: usize = 9;

    pub const ALL: [LineState; LineState::COUNT] = [
        LineState::LineStart,
        LineState::DirectiveArgument,
        LineState::DirectiveBody,
        LineState::HeaderOpen,
        LineState::HeaderName,
        LineState::HeaderClose,
        LineState::EntryBody,
        LineState::LineEnd,
        LineState::CommentTail,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// What the parser does with the token that triggered a transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Empty line; nothing is produced.
    BlankLine,
    BeginComment,
    BeginDirective(DirectiveKind),
    /// The section name opens the header node.
    BeginHeader,
    BeginEntry,
    /// Append the token to the node under construction.
    Append,
    /// Consume the token without storing it (brackets).
    Consume,
    /// Line break: close the node under construction.
    Finish,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub next: LineState,
}

/// One row of the production table before compilation.
#[derive(Debug, Clone)]
pub(crate) struct Production {
    pub(crate) from: LineState,
    pub(crate) on: TerminalSet,
    pub(crate) action: ActionRule,
    pub(crate) next: LineState,
}

/// Actions that depend on the triggering terminal are resolved at compile time.
#[derive(Debug, Copy, Clone)]
pub(crate) enum ActionRule {
    Fixed(Action),
    Directive,
}

const VALUES: TerminalSet = TerminalSet::of(&[
    TerminalKind::SignedFloat,
    TerminalKind::SignedInt,
    TerminalKind::Cname,
    TerminalKind::Id,
]);

const ARGUMENT_KEYWORDS: TerminalSet = TerminalSet::of(&[
    TerminalKind::Include,
    TerminalKind::Define,
    TerminalKind::Undef,
    TerminalKind::Ifdef,
    TerminalKind::Ifndef,
]);

const BARE_KEYWORDS: TerminalSet = TerminalSet::of(&[TerminalKind::Else, TerminalKind::Endif]);

const NEWLINE: TerminalSet = TerminalSet::of(&[TerminalKind::Newline]);

const COMMENT: TerminalSet = TerminalSet::of(&[TerminalKind::Comment]);

const PPCOMMENT: TerminalSet = TerminalSet::of(&[TerminalKind::PpComment]);

fn rule(from: LineState, on: TerminalSet, action: Action, next: LineState) -> Production {
    Production {
        from,
        on,
        action: ActionRule::Fixed(action),
        next,
    }
}

/// Rows that start a node; shared by the start of a line and the text after
/// a leading block comment.
fn line_openers(from: LineState) -> [Production; 6] {
    use LineState::*;

    [
        rule(from, COMMENT, Action::BeginComment, LineEnd),
        rule(from, PPCOMMENT, Action::BeginComment, CommentTail),
        Production {
            from,
            on: ARGUMENT_KEYWORDS,
            action: ActionRule::Directive,
            next: DirectiveArgument,
        },
        Production {
            from,
            on: BARE_KEYWORDS,
            action: ActionRule::Directive,
            next: DirectiveBody,
        },
        rule(from, TerminalSet::of(&[TerminalKind::Lsqb]), Action::Consume, HeaderOpen),
        rule(from, VALUES, Action::BeginEntry, EntryBody),
    ]
}

/// The topology grammar as a list of productions.
pub(crate) fn topology_productions() -> Vec<Production> {
    use LineState::*;

    let mut productions = vec![
        rule(LineStart, NEWLINE, Action::BlankLine, LineStart),
        rule(CommentTail, NEWLINE, Action::Finish, LineStart),
        // pp_directive
        rule(DirectiveArgument, PPCOMMENT, Action::Append, DirectiveArgument),
        rule(DirectiveArgument, TerminalSet::of(&[TerminalKind::Path]), Action::Append, DirectiveBody),
        rule(
            DirectiveBody,
            TerminalSet::of(&[TerminalKind::Path, TerminalKind::PpComment]),
            Action::Append,
            DirectiveBody,
        ),
        rule(DirectiveBody, COMMENT, Action::Append, LineEnd),
        rule(DirectiveBody, NEWLINE, Action::Finish, LineStart),
        // section_header
        rule(
            HeaderOpen,
            TerminalSet::of(&[TerminalKind::Cname, TerminalKind::Id]),
            Action::BeginHeader,
            HeaderName,
        ),
        rule(HeaderName, TerminalSet::of(&[TerminalKind::Rsqb]), Action::Consume, HeaderClose),
        rule(HeaderClose, PPCOMMENT, Action::Append, HeaderClose),
        rule(HeaderClose, COMMENT, Action::Append, LineEnd),
        rule(HeaderClose, NEWLINE, Action::Finish, LineStart),
        // entry
        rule(
            EntryBody,
            VALUES.with(TerminalKind::PpComment),
            Action::Append,
            EntryBody,
        ),
        rule(EntryBody, COMMENT, Action::Append, LineEnd),
        rule(EntryBody, NEWLINE, Action::Finish, LineStart),
        rule(LineEnd, NEWLINE, Action::Finish, LineStart),
    ];
    productions.extend(line_openers(LineStart));
    productions.extend(line_openers(CommentTail));
    productions
}
