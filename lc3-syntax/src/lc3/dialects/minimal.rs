//! The minimal LC-3 rule table: one state, no nesting.

use super::{Dialect, DialectOptions, DIRECTIVES, OPCODES, TRAP_ALIASES};
use crate::lc3::rules::{MatchSpec, RuleTableSpec, StateSpec, START_STATE};
use crate::lc3::token::classes;

pub(super) fn spec(options: &DialectOptions) -> RuleTableSpec {
    let instructions: Vec<&str> = OPCODES.iter().chain(TRAP_ALIASES).copied().collect();
    RuleTableSpec::new(Dialect::Lc3.id()).state(
        StateSpec::new(START_STATE)
            .rule(MatchSpec::words(classes::KEYWORD, &instructions).ignore_case())
            .rule(MatchSpec::regex(classes::REGISTER, r"\bR[0-7]\b").ignore_case())
            .rule(MatchSpec::regex(classes::DECIMAL, r"#-?[0-9]+\b"))
            .rule(MatchSpec::regex(classes::HEXADECIMAL, r"\bx-?[0-9A-F]+\b").ignore_case())
            .rule(MatchSpec::regex(classes::STRING, r#"'(?:[^\\']|\\.)*'"#))
            .rule(MatchSpec::regex(classes::STRING, r#""(?:[^\\"]|\\.)*""#))
            .rule(
                MatchSpec::words(classes::DIRECTIVE, DIRECTIVES)
                    .case_insensitive(options.directive_case.is_insensitive()),
            )
            .rule(MatchSpec::regex(classes::IDENTIFIER, r"\b[A-Za-z_][A-Za-z0-9_]*\b"))
            .rule(MatchSpec::regex(classes::COMMENT, ";.*").comment()),
    )
}
