//! Compilation of a [RuleTableSpec] into a [RuleTable].

use super::spec::{MatchSpec, PatternSpec, RuleSpec, RuleTableSpec};
use super::{
    LexerState, RuleAction, RuleTable, RuleTableError, TokenRule, Transition, START_STATE,
};
use crate::lc3::context::StateId;
use crate::lc3::token::TokenClass;
use log::debug;
use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use std::collections::HashMap;

pub(super) fn compile(spec: &RuleTableSpec) -> Result<RuleTable, RuleTableError> {
    let index = assign_ids(spec)?;
    let by_name: HashMap<&str, usize> = spec
        .states
        .iter()
        .enumerate()
        .map(|(i, state)| (state.name.as_str(), i))
        .collect();

    let mut states: Vec<Option<LexerState>> = vec![None; spec.states.len()];
    for state_spec in &spec.states {
        let mut visiting = vec![state_spec.name.clone()];
        let mut flattened = Vec::new();
        expand(spec, &by_name, state_spec.name.as_str(), &mut visiting, &mut flattened)?;

        let rules = flattened
            .into_iter()
            .map(|(owner, position, rule)| compile_rule(owner, position, rule, &index))
            .collect::<Result<Vec<_>, _>>()?;

        let fallback = state_spec
            .default_class
            .as_deref()
            .map(TokenClass::from)
            .unwrap_or_else(TokenClass::text);
        let id = index[state_spec.name.as_str()];
        states[id.0] = Some(LexerState {
            name: state_spec.name.clone(),
            fallback,
            rules,
        });
    }

    let states: Vec<LexerState> = states.into_iter().flatten().collect();
    debug!(
        "compiled rule table `{}`: {} states, {} rules",
        spec.name,
        states.len(),
        states.iter().map(|s| s.rules.len()).sum::<usize>()
    );
    Ok(RuleTable {
        name: spec.name.clone(),
        states,
        index: index.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    })
}

/// `start` gets id 0; the remaining states keep declaration order.
fn assign_ids(spec: &RuleTableSpec) -> Result<HashMap<&str, StateId>, RuleTableError> {
    if !spec.states.iter().any(|s| s.name == START_STATE) {
        return Err(RuleTableError::MissingStart {
            table: spec.name.clone(),
        });
    }
    let mut index = HashMap::new();
    index.insert(START_STATE, StateId::START);
    let mut next = 1;
    let mut seen_start = false;
    for state in &spec.states {
        if state.name == START_STATE {
            if seen_start {
                return Err(RuleTableError::DuplicateState {
                    state: state.name.clone(),
                });
            }
            seen_start = true;
            continue;
        }
        if index.insert(state.name.as_str(), StateId(next)).is_some() {
            return Err(RuleTableError::DuplicateState {
                state: state.name.clone(),
            });
        }
        next += 1;
    }
    Ok(index)
}

/// Flattens `state`'s rule list, splicing includes in place.
///
/// Each rule is tagged with the state that declared it and its position there, so errors
/// point at the declaration rather than at the including state.
fn expand<'s>(
    spec: &'s RuleTableSpec,
    by_name: &HashMap<&str, usize>,
    state: &'s str,
    visiting: &mut Vec<String>,
    out: &mut Vec<(&'s str, usize, &'s MatchSpec)>,
) -> Result<(), RuleTableError> {
    let declared = &spec.states[by_name[state]];
    for (position, rule) in declared.rules.iter().enumerate() {
        match rule {
            RuleSpec::Match(rule) => out.push((declared.name.as_str(), position, rule)),
            RuleSpec::Include { include } => {
                if visiting.iter().any(|v| v == include) {
                    let mut chain = visiting.clone();
                    chain.push(include.clone());
                    return Err(RuleTableError::IncludeCycle { chain });
                }
                if !by_name.contains_key(include.as_str()) {
                    return Err(RuleTableError::UnknownState {
                        state: declared.name.clone(),
                        rule: position,
                        target: include.clone(),
                    });
                }
                visiting.push(include.clone());
                expand(spec, by_name, include.as_str(), visiting, out)?;
                visiting.pop();
            }
        }
    }
    Ok(())
}

fn compile_rule(
    state: &str,
    position: usize,
    rule: &MatchSpec,
    index: &HashMap<&str, StateId>,
) -> Result<TokenRule, RuleTableError> {
    if let PatternSpec::Words(words) = &rule.pattern {
        if words.is_empty() {
            return Err(RuleTableError::EmptyWords {
                state: state.to_string(),
                rule: position,
            });
        }
    }

    let regex = Regex::builder()
        .syntax(syntax::Config::new().case_insensitive(rule.case_insensitive))
        .build(&rule.pattern.to_regex_source())
        .map_err(|source| RuleTableError::InvalidPattern {
            state: state.to_string(),
            rule: position,
            source,
        })?;

    let groups = regex.captures_len() - 1;
    if rule.captures.len() > groups {
        return Err(RuleTableError::CaptureMismatch {
            state: state.to_string(),
            rule: position,
            classes: rule.captures.len(),
            groups,
        });
    }

    let transition = match (&rule.push, rule.pop) {
        (Some(_), true) => {
            return Err(RuleTableError::ConflictingTransition {
                state: state.to_string(),
                rule: position,
            })
        }
        (Some(target), false) => {
            let id = index
                .get(target.as_str())
                .ok_or_else(|| RuleTableError::UnknownState {
                    state: state.to_string(),
                    rule: position,
                    target: target.clone(),
                })?;
            Transition::Push(*id)
        }
        (None, true) => Transition::Pop,
        (None, false) => Transition::None,
    };

    let action = if rule.comment {
        RuleAction::Comment
    } else if rule.captures.is_empty() {
        RuleAction::Emit
    } else {
        RuleAction::Capture(
            rule.captures
                .iter()
                .map(|c| TokenClass::from(c.as_str()))
                .collect(),
        )
    };

    Ok(TokenRule {
        class: TokenClass::from(rule.class.as_str()),
        regex,
        case_insensitive: rule.case_insensitive,
        action,
        transition,
    })
}
