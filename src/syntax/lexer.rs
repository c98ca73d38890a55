//! Contextual lexer for topology text.
//!
//! The lexer never decides on its own which terminals are allowed: the parser
//! passes the acceptable set of its current state to [`Lexer::next_token`],
//! and only those terminals compete for the next match. The full terminal set
//! is consulted only after a miss, to name what was found instead.

use tracing::{trace, warn};

use crate::grammar::{is_unterminated_block, Grammar, TerminalKind, TerminalSet};
use crate::syntax::{Position, Token};

/// No acceptable terminal matched at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexMiss {
    pub position: Position,
    /// The terminal that would have matched with no restriction, if any.
    /// `None` means nothing in the grammar recognizes the input here.
    pub found: Option<TerminalKind>,
    pub expected: TerminalSet,
}

pub struct Lexer<'g, 'src> {
    grammar: &'g Grammar,
    text: &'src str,
    position: Position,
}

impl<'g, 'src> Lexer<'g, 'src> {
    pub fn new(grammar: &'g Grammar, text: &'src str) -> Self {
        Self {
            grammar,
            text,
            position: Position::start(),
        }
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        self.position
    }

    fn rest(&self) -> &'src str {
        &self.text[self.position.offset..]
    }

    /// Reads the next token among `acceptable`, skipping ignored text first.
    ///
    /// Returns `Ok(None)` once only ignored text remains.
    pub fn next_token(&mut self, acceptable: TerminalSet) -> Result<Option<Token>, LexMiss> {
        let ignored = self.grammar.ignored_len(self.rest());
        self.advance(ignored);

        let rest = self.rest();
        if rest.is_empty() {
            return Ok(None);
        }

        let Some((terminal, len)) = self.grammar.longest_match(rest, acceptable) else {
            let found = self
                .grammar
                .longest_match(rest, TerminalSet::all())
                .map(|(kind, _)| kind);
            return Err(LexMiss {
                position: self.position,
                found,
                expected: acceptable,
            });
        };

        let text = &rest[..len];
        let token = Token {
            terminal,
            text: text.to_string(),
            start_offset: self.position.offset,
            line: self.position.line,
            column: self.position.column,
        };
        trace!(
            terminal = terminal.name(),
            line = token.line,
            column = token.column,
            text,
            "token"
        );
        if terminal == TerminalKind::PpComment && is_unterminated_block(text) {
            warn!(
                line = token.line,
                column = token.column,
                "block comment is not closed; it extends to the end of input"
            );
        }
        self.advance(len);
        Ok(Some(token))
    }

    fn advance(&mut self, len: usize) {
        let end = self.position.offset + len;
        for ch in self.text[self.position.offset..end].chars() {
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.position.offset = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: TerminalSet = TerminalSet::of(&[
        TerminalKind::SignedFloat,
        TerminalKind::SignedInt,
        TerminalKind::Cname,
        TerminalKind::Id,
        TerminalKind::PpComment,
        TerminalKind::Comment,
        TerminalKind::Newline,
    ]);

    fn lex_all(text: &str, acceptable: TerminalSet) -> Vec<Token> {
        let grammar = Grammar::new().unwrap();
        let mut lexer = Lexer::new(&grammar, text);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token(acceptable).unwrap() {
            tokens.push(token);
        }
        tokens
    }

    fn summary(tokens: &[Token]) -> Vec<(TerminalKind, &str, usize, usize)> {
        tokens
            .iter()
            .map(|t| (t.terminal, t.text.as_str(), t.line, t.column))
            .collect()
    }

    #[test]
    fn test_positions_across_lines() {
        let tokens = lex_all("1 CT\n  2 -0.5 ; q\n", VALUES);
        assert_eq!(
            summary(&tokens),
            [
                (TerminalKind::SignedInt, "1", 1, 1),
                (TerminalKind::Cname, "CT", 1, 3),
                (TerminalKind::Newline, "\n", 1, 5),
                (TerminalKind::SignedInt, "2", 2, 3),
                (TerminalKind::SignedFloat, "-0.5", 2, 5),
                (TerminalKind::Comment, "; q", 2, 10),
                (TerminalKind::Newline, "\n", 2, 13),
            ]
        );
        assert_eq!(tokens[3].start_offset, 7);
    }

    #[test]
    fn test_escaped_newline_is_skipped_but_counted() {
        let tokens = lex_all("1 \\\n 2\n", VALUES);
        assert_eq!(
            summary(&tokens),
            [
                (TerminalKind::SignedInt, "1", 1, 1),
                (TerminalKind::SignedInt, "2", 2, 2),
                (TerminalKind::Newline, "\n", 2, 3),
            ]
        );
    }

    #[test]
    fn test_tab_counts_as_one_column() {
        let tokens = lex_all("\tCA\n", VALUES);
        assert_eq!(tokens[0].column, 2);
        assert_eq!(tokens[0].start_offset, 1);
    }

    #[test]
    fn test_multibyte_text_uses_byte_offsets_and_char_columns() {
        let tokens = lex_all("; é\nX\n", VALUES);
        assert_eq!(tokens[0].text, "; é");
        assert_eq!(tokens[1].start_offset, 4);
        assert_eq!(tokens[1].column, 4);
        assert_eq!(tokens[2].start_offset, 5);
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
    }

    #[test]
    fn test_block_comment_advances_lines() {
        let tokens = lex_all("/* a\nb */ 1\n", VALUES);
        assert_eq!(tokens[0].terminal, TerminalKind::PpComment);
        assert_eq!((tokens[1].line, tokens[1].column), (2, 6));
    }

    #[test]
    fn test_first_marker_decides_comment_kind() {
        let tokens = lex_all("; a // b\n", VALUES);
        assert_eq!(tokens[0].terminal, TerminalKind::Comment);
        let tokens = lex_all("// a ; b\n", VALUES);
        assert_eq!(tokens[0].terminal, TerminalKind::PpComment);
        assert_eq!(tokens[0].text, "// a ; b");
    }

    #[test]
    fn test_miss_names_the_unrestricted_match() {
        let grammar = Grammar::new().unwrap();
        let mut lexer = Lexer::new(&grammar, "  ]\n");
        let miss = lexer.next_token(VALUES).unwrap_err();
        assert_eq!(miss.found, Some(TerminalKind::Rsqb));
        assert_eq!(miss.position.offset, 2);
        assert_eq!(miss.position.column, 3);
        assert_eq!(miss.expected, VALUES);
    }

    #[test]
    fn test_miss_without_any_terminal() {
        let grammar = Grammar::new().unwrap();
        let mut lexer = Lexer::new(&grammar, "\\ \\");
        let miss = lexer.next_token(TerminalSet::all()).unwrap_err();
        assert_eq!(miss.found, None);
        assert_eq!(miss.position.offset, 0);
    }

    #[test]
    fn test_end_of_input_after_ignored_text() {
        let grammar = Grammar::new().unwrap();
        let mut lexer = Lexer::new(&grammar, "   ");
        assert_eq!(lexer.next_token(VALUES), Ok(None));
        assert_eq!(lexer.position().offset, 3);
    }
}
