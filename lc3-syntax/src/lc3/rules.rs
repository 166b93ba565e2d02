//! Token rule tables
//!
//!     A rule table is an ordered list of rules per named lexer state. Within a state the
//!     first rule whose pattern matches at the scan position wins, regardless of how long
//!     a later rule's match would be.
//!
//!     Each compiled [TokenRule] spells out its behaviour as data rather than closures:
//!     what it emits ([RuleAction]) and what it does to the context stack ([Transition]).
//!     The matching engine is the only code that interprets them.
//!
//!     Tables are validated when compiled from their [RuleTableSpec]: every pattern must
//!     compile, every push/include target must exist, `start` must exist. Once compiled, a
//!     table cannot make tokenization fail.

mod compile;
pub mod spec;

pub use spec::{MatchSpec, PatternSpec, RuleSpec, RuleTableSpec, StateSpec};

use crate::lc3::context::StateId;
use crate::lc3::token::TokenClass;
use regex_automata::meta::{BuildError, Regex};
use std::collections::HashMap;

pub const START_STATE: &str = "start";

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule table `{table}` has no `start` state")]
    MissingStart { table: String },
    #[error("state `{state}` is declared more than once")]
    DuplicateState { state: String },
    #[error("rule {rule} of state `{state}` refers to unknown state `{target}`")]
    UnknownState {
        state: String,
        rule: usize,
        target: String,
    },
    #[error("include cycle: {}", .chain.join(" -> "))]
    IncludeCycle { chain: Vec<String> },
    #[error("rule {rule} of state `{state}` has an invalid pattern")]
    InvalidPattern {
        state: String,
        rule: usize,
        #[source]
        source: BuildError,
    },
    #[error("rule {rule} of state `{state}` has an empty word list")]
    EmptyWords { state: String, rule: usize },
    #[error(
        "rule {rule} of state `{state}` names {classes} capture classes but its pattern has {groups} groups"
    )]
    CaptureMismatch {
        state: String,
        rule: usize,
        classes: usize,
        groups: usize,
    },
    #[error("rule {rule} of state `{state}` both pushes and pops")]
    ConflictingTransition { state: String, rule: usize },
}

/// What a matched rule emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// One token covering the whole match.
    Emit,
    /// One token per capture group, in group order.
    Capture(Vec<TokenClass>),
    /// One token from the match start to end of line; the scan stops there.
    Comment,
}

/// What a matched rule does to the context stack after emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(StateId),
    Pop,
}

#[derive(Debug, Clone)]
pub struct TokenRule {
    class: TokenClass,
    regex: Regex,
    case_insensitive: bool,
    action: RuleAction,
    transition: Transition,
}

impl TokenRule {
    pub fn class(&self) -> &TokenClass {
        &self.class
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}

#[derive(Debug, Clone)]
pub struct LexerState {
    name: String,
    fallback: TokenClass,
    rules: Vec<TokenRule>,
}

impl LexerState {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class given to characters no rule matches.
    pub fn fallback(&self) -> &TokenClass {
        &self.fallback
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }
}

/// A compiled, validated rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    states: Vec<LexerState>,
    index: HashMap<String, StateId>,
}

impl RuleTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state `id` names, or `start` when `id` does not belong to this table.
    pub fn state(&self, id: StateId) -> &LexerState {
        self.states
            .get(id.0)
            .unwrap_or(&self.states[StateId::START.0])
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn state_name(&self, id: StateId) -> &str {
        self.state(id).name()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &LexerState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateId(i), state))
    }
}
