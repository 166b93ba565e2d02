//! Matching engine
//!
//!     Given a lexer state, a line and an offset, pick the first rule in declaration order
//!     whose pattern matches starting exactly at that offset. Searches are anchored at the
//!     offset but run over the whole line, so `^`, `$` and `\b` still see the characters
//!     around it. An anchored search gives up as soon as the pattern cannot continue,
//!     which keeps a line linear in its length however little of it the rules match.
//!
//!     Zero-length matches are rejected and the next rule is tried, so every outcome
//!     consumes at least one character. When no rule matches, the outcome is a fallback
//!     covering exactly one char, classed with the state's fallback class.

use crate::lc3::rules::{LexerState, RuleAction, TokenRule};
use crate::lc3::token::{Token, TokenClass};
use regex_automata::{Anchored, Input};
use std::ops::Range;

#[derive(Debug)]
pub enum MatchOutcome<'t> {
    Rule(RuleMatch<'t>),
    Fallback { class: &'t TokenClass, span: Range<usize> },
}

impl MatchOutcome<'_> {
    /// Byte range consumed from the line. Never empty.
    pub fn span(&self) -> Range<usize> {
        match self {
            MatchOutcome::Rule(m) => m.span.clone(),
            MatchOutcome::Fallback { span, .. } => span.clone(),
        }
    }
}

#[derive(Debug)]
pub struct RuleMatch<'t> {
    pub rule: &'t TokenRule,
    pub span: Range<usize>,
    groups: Vec<Option<Range<usize>>>,
}

impl RuleMatch<'_> {
    /// Appends the tokens this match produces.
    ///
    /// Capture rules emit one token per non-empty group, in group order. Any part of the
    /// match not covered by a group (separators, nested or overlapping groups) is emitted
    /// with the rule's own class so the span stays fully covered.
    pub fn emit_into(&self, tokens: &mut Vec<Token>) {
        match self.rule.action() {
            RuleAction::Emit | RuleAction::Comment => {
                push_span(tokens, self.rule.class(), self.span.clone());
            }
            RuleAction::Capture(classes) => {
                let mut cursor = self.span.start;
                for (group, class) in self.groups.iter().zip(classes) {
                    let Some(group) = group else { continue };
                    if group.is_empty() || group.start < cursor {
                        continue;
                    }
                    if group.start > cursor {
                        push_span(tokens, self.rule.class(), cursor..group.start);
                    }
                    push_span(tokens, class, group.clone());
                    cursor = group.end;
                }
                if cursor < self.span.end {
                    push_span(tokens, self.rule.class(), cursor..self.span.end);
                }
            }
        }
    }
}

fn push_span(tokens: &mut Vec<Token>, class: &TokenClass, span: Range<usize>) {
    tokens.push(Token::new(class.clone(), span.start, span.len()));
}

/// Selects the rule of `state` that applies at `offset` in `line`.
///
/// `offset` must be a char boundary strictly inside the line.
pub fn match_at<'t>(state: &'t LexerState, line: &str, offset: usize) -> MatchOutcome<'t> {
    for rule in state.rules() {
        if let Some(found) = try_rule(rule, line, offset) {
            return MatchOutcome::Rule(found);
        }
    }
    let width = line[offset..].chars().next().map_or(1, char::len_utf8);
    MatchOutcome::Fallback {
        class: state.fallback(),
        span: offset..offset + width,
    }
}

fn try_rule<'t>(rule: &'t TokenRule, line: &str, offset: usize) -> Option<RuleMatch<'t>> {
    let input = Input::new(line)
        .span(offset..line.len())
        .anchored(Anchored::Yes);
    match rule.action() {
        RuleAction::Capture(_) => {
            let regex = rule.regex();
            let mut caps = regex.create_captures();
            regex.search_captures(&input, &mut caps);
            let whole = caps.get_match()?;
            if whole.is_empty() {
                return None;
            }
            let groups = (1..regex.captures_len())
                .map(|i| caps.get_group(i).map(|g| g.range()))
                .collect();
            Some(RuleMatch {
                rule,
                span: whole.range(),
                groups,
            })
        }
        RuleAction::Emit | RuleAction::Comment => {
            let whole = rule.regex().search(&input)?;
            if whole.is_empty() {
                return None;
            }
            let end = match rule.action() {
                RuleAction::Comment => line.len(),
                _ => whole.end(),
            };
            Some(RuleMatch {
                rule,
                span: offset..end,
                groups: Vec::new(),
            })
        }
    }
}
