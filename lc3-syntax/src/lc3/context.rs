//! Context stack
//!
//!     The stack of active lexer states. The top selects which rules apply at the current
//!     scan position; the bottom is always the `start` state and can never be popped, so
//!     a stray close directive in top-level code is harmless.
//!
//!     Stacks are small value types: the buffer keeps one snapshot per line boundary and
//!     compares them to decide whether a change needs to propagate.

use crate::lc3::rules::RuleTable;
use serde::Serialize;

/// Index of a state within its [RuleTable]. `start` is always index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub const START: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextStack {
    frames: Vec<StateId>,
}

impl ContextStack {
    /// A stack holding only `start`.
    pub fn start() -> Self {
        ContextStack {
            frames: vec![StateId::START],
        }
    }

    /// Builds a stack from `start` followed by `nested`, bottom first.
    pub fn nested(nested: impl IntoIterator<Item = StateId>) -> Self {
        let mut stack = ContextStack::start();
        for state in nested {
            stack.push(state);
        }
        stack
    }

    pub fn top(&self) -> StateId {
        self.frames.last().copied().unwrap_or(StateId::START)
    }

    pub fn push(&mut self, state: StateId) {
        self.frames.push(state);
    }

    /// Pops the top state. Popping the bottom `start` frame is a no-op and returns `None`.
    pub fn pop(&mut self) -> Option<StateId> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_start(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn frames(&self) -> &[StateId] {
        &self.frames
    }

    /// State names bottom first, for display and serialization.
    pub fn names<'t>(&self, table: &'t RuleTable) -> Vec<&'t str> {
        self.frames
            .iter()
            .map(|&state| table.state_name(state))
            .collect()
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::start()
    }
}
