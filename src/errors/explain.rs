//! Human-readable descriptions of grammar terminals.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static TERMINALS_EXPLAINED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("SIGNED_INT", "Integer with optional sign: `1234`, `-1234`"),
        (
            "SIGNED_FLOAT",
            "Float, may be in sientific format: `.1`, `-1.`, `0.2e+05`",
        ),
        ("CNAME", "C-style identifier: `A1`, `_undersored_0`"),
        (
            "ID",
            "Allowed non-number identifier (atom names/types and so on): `-N1*+'`",
        ),
        (
            "_IGNORE",
            r"Non-linebreaking spaces: space, tab; escaped newline: `\\s*\r?\n`; empty lines: `\s+\r?\n`",
        ),
        ("_INCLUDE", "`#include`"),
        ("_DEFINE", "`#define`"),
        ("_UNDEF", "`#undef`"),
        ("_IFDEF", "`#ifdef`"),
        ("_IFNDEF", "`#ifndef`"),
        ("_ELSE", "`#else`"),
        ("_ENDIF", "`#endif`"),
        (
            "PATH",
            r"Any string, may be interpreted as posix path: `a`, `/a`, `/// \\/.\//`",
        ),
        ("PPCOMMENT", "Preprocessor comment: `//comment`, `/*comment*/`"),
        ("COMMENT", "Topology comment: `;comment`"),
        ("_NEWLINE", r"New line: `\r?\n`"),
        ("LSQB", "Left square bracket: `[`"),
        ("RSQB", "Right square bracket: `]`"),
    ])
});

/// Describes a terminal identifier; unknown identifiers are returned as is.
pub fn explain(terminal_id: &str) -> &str {
    TERMINALS_EXPLAINED
        .get(terminal_id)
        .copied()
        .unwrap_or(terminal_id)
}

/// Whether `terminal_id` has a registered description.
pub fn is_explained(terminal_id: &str) -> bool {
    TERMINALS_EXPLAINED.contains_key(terminal_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::TerminalKind;

    #[test]
    fn test_known_terminals() {
        assert_eq!(explain("RSQB"), "Right square bracket: `]`");
        assert_eq!(
            explain("SIGNED_INT"),
            "Integer with optional sign: `1234`, `-1234`"
        );
        assert_eq!(explain("_NEWLINE"), "New line: `\\r?\\n`");
    }

    #[test]
    fn test_unknown_terminal_falls_back_to_identifier() {
        assert_eq!(explain("$END"), "$END");
        assert_eq!(explain(""), "");
        assert!(!is_explained("BOGUS"));
    }

    #[test]
    fn test_every_grammar_terminal_is_explained() {
        for kind in TerminalKind::ALL {
            assert!(is_explained(kind.name()), "{kind} has no description");
        }
    }
}
