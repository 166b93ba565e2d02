//! Rule table description
//!
//!     The data form of a rule table. Built-in dialects assemble these with the builder
//!     methods below; user-supplied tables deserialize from JSON. Either way the
//!     description is compiled exactly once into a [RuleTable](super::RuleTable), which
//!     is where all validation happens.

use super::compile::compile;
use super::{RuleTable, RuleTableError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTableSpec {
    pub name: String,
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub name: String,
    /// Class for characters no rule in this state matches. `text` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_class: Option<String>,
    pub rules: Vec<RuleSpec>,
}

/// One entry of a state's ordered rule list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Splice in the rules of another state at this position.
    Include { include: String },
    Match(MatchSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    pub class: String,
    pub pattern: PatternSpec,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<String>,
    #[serde(default)]
    pub pop: bool,
    /// Classes for successive capture groups. Empty means one token for the whole match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<String>,
    /// Token runs to end of line and ends the scan.
    #[serde(default)]
    pub comment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSpec {
    Regex(String),
    /// Literal words, matched as a whole-word alternation.
    Words(Vec<String>),
}

impl RuleTableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        RuleTableSpec {
            name: name.into(),
            states: Vec::new(),
        }
    }

    pub fn state(mut self, state: StateSpec) -> Self {
        self.states.push(state);
        self
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn compile(&self) -> Result<RuleTable, RuleTableError> {
        compile(self)
    }
}

impl StateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        StateSpec {
            name: name.into(),
            default_class: None,
            rules: Vec::new(),
        }
    }

    pub fn default_class(mut self, class: impl Into<String>) -> Self {
        self.default_class = Some(class.into());
        self
    }

    pub fn rule(mut self, rule: MatchSpec) -> Self {
        self.rules.push(RuleSpec::Match(rule));
        self
    }

    pub fn include(mut self, state: impl Into<String>) -> Self {
        self.rules.push(RuleSpec::Include {
            include: state.into(),
        });
        self
    }
}

impl MatchSpec {
    fn with_pattern(class: &str, pattern: PatternSpec) -> Self {
        MatchSpec {
            class: class.to_string(),
            pattern,
            case_insensitive: false,
            push: None,
            pop: false,
            captures: Vec::new(),
            comment: false,
        }
    }

    pub fn regex(class: &str, pattern: &str) -> Self {
        Self::with_pattern(class, PatternSpec::Regex(pattern.to_string()))
    }

    pub fn words(class: &str, words: &[&str]) -> Self {
        Self::with_pattern(
            class,
            PatternSpec::Words(words.iter().map(|w| w.to_string()).collect()),
        )
    }

    pub fn ignore_case(self) -> Self {
        self.case_insensitive(true)
    }

    pub fn case_insensitive(mut self, insensitive: bool) -> Self {
        self.case_insensitive = insensitive;
        self
    }

    pub fn push(mut self, state: &str) -> Self {
        self.push = Some(state.to_string());
        self
    }

    pub fn pop(mut self) -> Self {
        self.pop = true;
        self
    }

    pub fn captures(mut self, classes: &[&str]) -> Self {
        self.captures = classes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn comment(mut self) -> Self {
        self.comment = true;
        self
    }
}

impl PatternSpec {
    /// The regex source this pattern compiles to.
    ///
    /// Word lists get a word boundary on each side only where every word starts (or
    /// ends) with a word character, so `.ORIG`-style names still match after whitespace.
    pub fn to_regex_source(&self) -> String {
        match self {
            PatternSpec::Regex(source) => source.clone(),
            PatternSpec::Words(words) => {
                let mut sorted: Vec<&String> = words.iter().collect();
                // Longest first, so no word loses to one of its own prefixes.
                sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
                let alternation = sorted
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
                let lead = words.iter().all(|w| is_word(w.chars().next()));
                let trail = words.iter().all(|w| is_word(w.chars().last()));
                format!(
                    "{}(?:{}){}",
                    if lead { r"\b" } else { "" },
                    alternation,
                    if trail { r"\b" } else { "" }
                )
            }
        }
    }
}
