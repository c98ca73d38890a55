//! Handles all user-facing output for the CLI.
//!
//! Status lines are coloured on terminals; diagnostics go to stderr.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::syntax::{Token, Topology};

// ============================================================================
// STATUS LINES
// ============================================================================

pub fn print_ok(path: &Path) {
    print_status(Color::Green, "ok", path);
}

pub fn print_failed(path: &Path) {
    print_status(Color::Red, "FAILED", path);
}

pub fn print_summary(checked: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{} of {} files parsed", checked - failed, checked);
    let _ = stdout.reset();
    let _ = writeln!(stdout);
}

fn print_status(color: Color, word: &str, path: &Path) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{word}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
}

// ============================================================================
// TREES AND TOKENS
// ============================================================================

pub fn print_tree(topology: &Topology) {
    print!("{}", topology.pretty());
}

pub fn print_tree_json(topology: &Topology) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(topology)?);
    Ok(())
}

/// `line:column TERMINAL text`, one token per line.
pub fn format_token(token: &Token) -> String {
    format!(
        "{}:{} {} {:?}",
        token.line, token.column, token.terminal, token.text
    )
}

pub fn print_tokens(tokens: &[Token]) {
    for token in tokens {
        println!("{}", format_token(token));
    }
}

pub fn print_explanation(terminal: &str, explanation: &str) {
    println!("{terminal}: {explanation}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::TerminalKind;

    #[test]
    fn test_token_line_quotes_text() {
        let token = Token {
            terminal: TerminalKind::Newline,
            text: "\n".to_string(),
            start_offset: 4,
            line: 1,
            column: 5,
        };
        assert_eq!(format_token(&token), "1:5 _NEWLINE \"\\n\"");
    }
}
