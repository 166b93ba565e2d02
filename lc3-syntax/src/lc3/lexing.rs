//! Line tokenizer
//!
//!     `tokenize_line(table, text, entry)` is a pure function: the same text and entry
//!     context always give the same tokens and exit context. It scans left to right,
//!     asking the matching engine for the state on top of a private copy of the entry
//!     stack, emitting tokens, applying push/pop, and advancing by the consumed span.
//!
//!     Adjacent fallback characters of the same class are merged into one token, so a run
//!     of unclaimed whitespace becomes a single `text` token instead of one per char.
//!     Tokens produced by rules are never merged.

use crate::lc3::context::ContextStack;
use crate::lc3::matching::{match_at, MatchOutcome};
use crate::lc3::rules::{RuleAction, RuleTable, Transition};
use crate::lc3::token::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    pub tokens: Vec<Token>,
    pub exit: ContextStack,
}

pub fn tokenize_line(table: &RuleTable, text: &str, entry: &ContextStack) -> LineTokens {
    let mut stack = entry.clone();
    let mut tokens: Vec<Token> = Vec::new();
    let mut offset = 0;
    // Index of the last token if it came from a fallback, for merging.
    let mut open_fallback: Option<usize> = None;

    while offset < text.len() {
        let state = table.state(stack.top());
        match match_at(state, text, offset) {
            MatchOutcome::Rule(found) => {
                found.emit_into(&mut tokens);
                open_fallback = None;
                offset = found.span.end;
                match found.rule.transition() {
                    Transition::Push(next) => stack.push(next),
                    Transition::Pop => {
                        stack.pop();
                    }
                    Transition::None => {}
                }
                if matches!(found.rule.action(), RuleAction::Comment) {
                    break;
                }
            }
            MatchOutcome::Fallback { class, span } => {
                let merged = match open_fallback {
                    Some(i) if tokens[i].class == *class && tokens[i].end() == span.start => {
                        tokens[i].len += span.len();
                        true
                    }
                    _ => false,
                };
                if !merged {
                    open_fallback = Some(tokens.len());
                    tokens.push(Token::new(class.clone(), span.start, span.len()));
                }
                offset = span.end;
            }
        }
    }

    LineTokens {
        tokens,
        exit: stack,
    }
}

impl RuleTable {
    /// Tokenizes one line; see [tokenize_line].
    pub fn tokenize_line(&self, text: &str, entry: &ContextStack) -> LineTokens {
        tokenize_line(self, text, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lc3::rules::{MatchSpec, RuleTableSpec, StateSpec, START_STATE};
    use crate::lc3::testing::{assert_partition, pieces};
    use crate::lc3::token::classes;

    fn block_table() -> RuleTable {
        RuleTableSpec::new("blocks")
            .state(
                StateSpec::new(START_STATE)
                    .rule(MatchSpec::regex(classes::DIRECTIVE, r"^\[").push("block"))
                    .rule(MatchSpec::words(classes::KEYWORD, &["add"]).ignore_case())
                    .rule(MatchSpec::regex(classes::COMMENT, ";").comment()),
            )
            .state(
                StateSpec::new("block")
                    .default_class(classes::DIRECTIVE)
                    .rule(MatchSpec::regex(classes::DIRECTIVE, r"\]$").pop()),
            )
            .compile()
            .unwrap()
    }

    #[test]
    fn test_empty_line_yields_no_tokens() {
        let table = block_table();
        let out = tokenize_line(&table, "", &ContextStack::start());
        assert!(out.tokens.is_empty());
        assert!(out.exit.is_start());
    }

    #[test]
    fn test_fallback_runs_are_merged() {
        let table = block_table();
        let line = "   add  x";
        let out = tokenize_line(&table, line, &ContextStack::start());
        assert_eq!(
            pieces(&out.tokens, line),
            vec![
                (classes::TEXT, "   "),
                (classes::KEYWORD, "add"),
                (classes::TEXT, "  x"),
            ]
        );
        assert_partition(&out.tokens, line);
    }

    #[test]
    fn test_push_and_pop_on_one_line() {
        let table = block_table();
        let line = "[section add]";
        let out = tokenize_line(&table, line, &ContextStack::start());
        assert!(out.exit.is_start());
        assert_eq!(
            pieces(&out.tokens, line),
            vec![
                (classes::DIRECTIVE, "["),
                (classes::DIRECTIVE, "section add"),
                (classes::DIRECTIVE, "]"),
            ]
        );
    }

    #[test]
    fn test_unterminated_push_carries_to_exit() {
        let table = block_table();
        let out = tokenize_line(&table, "[section", &ContextStack::start());
        assert_eq!(out.exit.names(&table), vec!["start", "block"]);
    }

    #[test]
    fn test_comment_stops_the_scan() {
        let table = block_table();
        let line = "add ; add [";
        let out = tokenize_line(&table, line, &ContextStack::start());
        let last = out.tokens.last().unwrap();
        assert_eq!(last.class, classes::COMMENT);
        assert_eq!(last.text(line), "; add [");
        assert!(out.exit.is_start());
    }

    #[test]
    fn test_same_input_same_output() {
        let table = block_table();
        let entry = ContextStack::start();
        let first = tokenize_line(&table, "[x ; add", &entry);
        let second = tokenize_line(&table, "[x ; add", &entry);
        assert_eq!(first, second);
    }
}
