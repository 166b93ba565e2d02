//! Testing helpers
//!
//!     Shared by the unit tests and the integration tests under `tests/`. Assertions here
//!     check structural invariants (partitioning, determinism); dialect-specific
//!     expectations belong with the tests that make them.

use crate::lc3::buffer::{LineEntry, TokenizedBuffer};
use crate::lc3::context::ContextStack;
use crate::lc3::lexing::tokenize_line;
use crate::lc3::rules::RuleTable;
use crate::lc3::token::Token;
use std::sync::Arc;

/// `(class, text)` pairs for each token of `line`.
pub fn pieces<'a>(tokens: &'a [Token], line: &'a str) -> Vec<(&'a str, &'a str)> {
    tokens
        .iter()
        .map(|t| (t.class.as_str(), t.text(line)))
        .collect()
}

/// Tokenizes `line` from the `start` context and returns its `(class, text)` pairs.
pub fn classify(table: &RuleTable, line: &str) -> Vec<(String, String)> {
    let out = tokenize_line(table, line, &ContextStack::start());
    out.tokens
        .iter()
        .map(|t| (t.class.to_string(), t.text(line).to_string()))
        .collect()
}

/// Class of the token covering byte `offset` of `line`, tokenized from `start`.
pub fn class_at(table: &RuleTable, line: &str, offset: usize) -> Option<String> {
    tokenize_line(table, line, &ContextStack::start())
        .tokens
        .iter()
        .find(|t| t.span().contains(&offset))
        .map(|t| t.class.to_string())
}

/// Panics unless `tokens` cover `line` exactly, in order, with no gaps or overlaps.
pub fn assert_partition(tokens: &[Token], line: &str) {
    let mut cursor = 0;
    for token in tokens {
        assert!(token.len > 0, "empty token {token:?} in {line:?}");
        assert_eq!(
            token.start, cursor,
            "token {token:?} does not start where the previous one ended in {line:?}"
        );
        assert!(
            line.is_char_boundary(token.start) && line.is_char_boundary(token.end()),
            "token {token:?} splits a char in {line:?}"
        );
        cursor = token.end();
    }
    assert_eq!(cursor, line.len(), "tokens do not reach end of {line:?}");
}

/// Line entries of `lines` tokenized from scratch, for comparing against incremental
/// results.
pub fn full_entries(table: &Arc<RuleTable>, lines: &[String]) -> Vec<LineEntry> {
    TokenizedBuffer::from_lines(Arc::clone(table), lines.iter().cloned())
        .entries()
        .to_vec()
}
