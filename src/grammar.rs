//! The topology grammar table.
//!
//! A [`Grammar`] holds the closed set of terminals (recognition rule and
//! tie-break priority for each) and the productions compiled into a dense
//! `(state, terminal) -> transition` table. It is built once with
//! [`Grammar::new`], exposes no mutation, and is meant to be shared between
//! parsers through an `Arc`.

use regex::Regex;
use thiserror::Error;

pub mod production;
pub mod terminal;

pub use production::{Action, LineState, Transition};
pub use terminal::{is_unterminated_block, Terminal, TerminalKind, TerminalSet};

use production::{ActionRule, Production};
use terminal::{scan_path, scan_pp_comment, Matcher};

/// Directive keywords outrank everything else on equal match length.
const PRIORITY_KEYWORD: u8 = 3;
const PRIORITY_PUNCT: u8 = 2;
const PRIORITY_CNAME: u8 = 1;
const PRIORITY_FALLBACK: u8 = 0;

/// Spaces, tabs, and escaped line breaks (line continuation).
const IGNORED_PATTERN: &str = r"(?:[ \t]+|\\[ \t]*\r?\n)+";

/// Failure to build a [`Grammar`].
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid pattern for terminal {terminal}: {source}")]
    InvalidPattern {
        terminal: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("conflicting productions in state {state:?} on terminal {terminal}")]
    Conflict {
        state: LineState,
        terminal: TerminalKind,
    },
}

/// Terminals and productions of the topology grammar.
#[derive(Debug)]
pub struct Grammar {
    terminals: Vec<Terminal>,
    ignored: Regex,
    table: Vec<Option<Transition>>,
    acceptable: [TerminalSet; LineState::COUNT],
}

impl Grammar {
    /// Builds the topology grammar.
    pub fn new() -> Result<Self, GrammarError> {
        let terminals = topology_terminals()?;
        let ignored = Regex::new(&format!("^{IGNORED_PATTERN}")).map_err(|source| {
            GrammarError::InvalidPattern {
                terminal: "_IGNORE",
                source,
            }
        })?;
        let (table, acceptable) = compile(&production::topology_productions())?;
        Ok(Self {
            terminals,
            ignored,
            table,
            acceptable,
        })
    }

    pub fn terminal(&self, kind: TerminalKind) -> &Terminal {
        &self.terminals[kind.index()]
    }

    /// Terminals that have a transition out of `state`.
    pub fn acceptable(&self, state: LineState) -> TerminalSet {
        self.acceptable[state.index()]
    }

    pub fn transition(&self, state: LineState, kind: TerminalKind) -> Option<Transition> {
        self.table[state.index() * TerminalKind::COUNT + kind.index()]
    }

    /// Length in bytes of ignored text (blanks, escaped line breaks) at the
    /// start of `rest`.
    pub fn ignored_len(&self, rest: &str) -> usize {
        self.ignored.find(rest).map_or(0, |m| m.end())
    }

    /// Longest match at the start of `rest` among `candidates`.
    ///
    /// Ties on length go to the higher priority, then to the terminal that
    /// comes first in enumeration order.
    pub fn longest_match(
        &self,
        rest: &str,
        candidates: TerminalSet,
    ) -> Option<(TerminalKind, usize)> {
        let mut best: Option<(TerminalKind, usize, u8)> = None;
        for kind in candidates.iter() {
            let terminal = self.terminal(kind);
            let Some(len) = terminal.match_len(rest) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, best_len, best_priority)) => {
                    len > best_len || (len == best_len && terminal.priority() > best_priority)
                }
            };
            if better {
                best = Some((kind, len, terminal.priority()));
            }
        }
        best.map(|(kind, len, _)| (kind, len))
    }
}

fn pattern(kind: TerminalKind, source: &str, priority: u8) -> Result<Terminal, GrammarError> {
    let matcher = Matcher::pattern(source).map_err(|source| GrammarError::InvalidPattern {
        terminal: kind.name(),
        source,
    })?;
    Ok(Terminal::new(kind, matcher, priority))
}

fn keyword(kind: TerminalKind, word: &str) -> Result<Terminal, GrammarError> {
    pattern(kind, &format!(r"{}\b", regex::escape(word)), PRIORITY_KEYWORD)
}

fn topology_terminals() -> Result<Vec<Terminal>, GrammarError> {
    use TerminalKind as T;

    let terminals = vec![
        keyword(T::Include, "#include")?,
        keyword(T::Define, "#define")?,
        keyword(T::Undef, "#undef")?,
        keyword(T::Ifdef, "#ifdef")?,
        keyword(T::Ifndef, "#ifndef")?,
        keyword(T::Else, "#else")?,
        keyword(T::Endif, "#endif")?,
        Terminal::new(T::PpComment, Matcher::Scan(scan_pp_comment), PRIORITY_PUNCT),
        pattern(T::Comment, r";[^\r\n]*", PRIORITY_PUNCT)?,
        Terminal::new(T::Lsqb, Matcher::Literal("["), PRIORITY_PUNCT),
        Terminal::new(T::Rsqb, Matcher::Literal("]"), PRIORITY_PUNCT),
        pattern(
            T::SignedFloat,
            r"[+-]?(?:(?:\d+\.\d*|\.\d+)(?:[eE][+-]?\d+)?|\d+[eE][+-]?\d+)",
            PRIORITY_PUNCT,
        )?,
        pattern(T::SignedInt, r"[+-]?\d+", PRIORITY_PUNCT)?,
        pattern(T::Cname, r"[A-Za-z_][A-Za-z0-9_]*", PRIORITY_CNAME)?,
        pattern(
            T::Id,
            r"[A-Za-z0-9_*'+\-.]*[A-Za-z_*'][A-Za-z0-9_*'+\-.]*",
            PRIORITY_FALLBACK,
        )?,
        Terminal::new(T::Path, Matcher::Scan(scan_path), PRIORITY_FALLBACK),
        pattern(T::Newline, r"\r?\n", PRIORITY_FALLBACK)?,
    ];
    debug_assert!(terminals
        .iter()
        .zip(TerminalKind::ALL)
        .all(|(terminal, kind)| terminal.kind() == kind));
    Ok(terminals)
}

type CompiledTable = (Vec<Option<Transition>>, [TerminalSet; LineState::COUNT]);

fn compile(productions: &[Production]) -> Result<CompiledTable, GrammarError> {
    let mut table = vec![None; LineState::COUNT * TerminalKind::COUNT];
    let mut acceptable = [TerminalSet::EMPTY; LineState::COUNT];

    for production in productions {
        for kind in production.on.iter() {
            let action = match production.action {
                ActionRule::Fixed(action) => action,
                ActionRule::Directive => match kind.directive_kind() {
                    Some(directive) => Action::BeginDirective(directive),
                    None => {
                        return Err(GrammarError::Conflict {
                            state: production.from,
                            terminal: kind,
                        })
                    }
                },
            };
            let slot = &mut table[production.from.index() * TerminalKind::COUNT + kind.index()];
            if slot.is_some() {
                return Err(GrammarError::Conflict {
                    state: production.from,
                    terminal: kind,
                });
            }
            *slot = Some(Transition {
                action,
                next: production.next,
            });
            acceptable[production.from.index()] = acceptable[production.from.index()].with(kind);
        }
    }
    Ok((table, acceptable))
}
