use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DispatchError;

/// The three supported matching rule kinds.
///
/// The numeric codes (`1` = exact, `2` = glob, `3` = regex) are the wire-level
/// identifiers accepted by [`RuleKind::from_code`] and
/// [`Listener::from_parts`](crate::Listener::from_parts); anything outside
/// that range is rejected with [`DispatchError::InvalidRuleKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Exact string equality against the event name.
    Exact,
    /// Path-style glob pattern (`*`, `?`, character classes).
    Glob,
    /// Regular expression matched anywhere in the event name.
    Regex,
}

impl RuleKind {
    pub const EXACT_CODE: i64 = 1;
    pub const GLOB_CODE: i64 = 2;
    pub const REGEX_CODE: i64 = 3;

    /// Resolve a numeric kind code, rejecting unrecognized values.
    pub fn from_code(code: i64) -> Result<Self, DispatchError> {
        match code {
            Self::EXACT_CODE => Ok(RuleKind::Exact),
            Self::GLOB_CODE => Ok(RuleKind::Glob),
            Self::REGEX_CODE => Ok(RuleKind::Regex),
            _ => Err(DispatchError::InvalidRuleKind { code }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            RuleKind::Exact => Self::EXACT_CODE,
            RuleKind::Glob => Self::GLOB_CODE,
            RuleKind::Regex => Self::REGEX_CODE,
        }
    }
}

/// A listener's matching rule: a kind plus a pattern literal.
///
/// The pattern literal doubles as the listener's identity for removal:
/// [`EventDispatcher::remove_listeners`](crate::EventDispatcher::remove_listeners)
/// deletes every listener whose pattern equals the given literal, regardless
/// of kind.
///
/// Glob and regex patterns are compiled when evaluated, not when the rule is
/// built, so a malformed pattern surfaces as a [`MatchError`] during the
/// delivery pass rather than up front. The dispatcher records such failures
/// per listener and keeps delivering to the rest.
///
/// # Example
///
/// ```
/// use signalbus::MatchRule;
///
/// assert!(MatchRule::exact("tick").matches("tick").unwrap());
/// assert!(MatchRule::glob("job:*").matches("job:started").unwrap());
/// assert!(MatchRule::regex("a[0-9]").matches("a1").unwrap());
/// assert!(MatchRule::regex("a[").matches("a1").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    kind: RuleKind,
    pattern: String,
}

impl MatchRule {
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Exact,
            pattern: pattern.into(),
        }
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Glob,
            pattern: pattern.into(),
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Regex,
            pattern: pattern.into(),
        }
    }

    /// Build a rule from a numeric kind code and a pattern literal.
    pub fn from_code(code: i64, pattern: impl Into<String>) -> Result<Self, DispatchError> {
        Ok(Self {
            kind: RuleKind::from_code(code)?,
            pattern: pattern.into(),
        })
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The pattern literal, also used as the removal key.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Evaluate this rule against a candidate event name.
    pub fn matches(&self, name: &str) -> Result<bool, MatchError> {
        match self.kind {
            RuleKind::Exact => Ok(self.pattern == name),
            RuleKind::Glob => {
                let pattern =
                    glob::Pattern::new(&self.pattern).map_err(|source| MatchError::Glob {
                        pattern: self.pattern.clone(),
                        source,
                    })?;
                Ok(pattern.matches(name))
            }
            RuleKind::Regex => {
                let regex = regex::Regex::new(&self.pattern).map_err(|source| MatchError::Regex {
                    pattern: self.pattern.clone(),
                    source: Box::new(source),
                })?;
                Ok(regex.is_match(name))
            }
        }
    }
}

/// Failure evaluating a single rule against an event name.
#[derive(Debug, Error, Diagnostic)]
pub enum MatchError {
    #[error("malformed glob pattern {pattern:?}")]
    #[diagnostic(code(signalbus::matcher::glob))]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("malformed regex pattern {pattern:?}")]
    #[diagnostic(code(signalbus::matcher::regex))]
    Regex {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_full_equality() {
        let rule = MatchRule::exact("a");
        assert!(rule.matches("a").unwrap());
        assert!(!rule.matches("a1").unwrap());
    }

    #[test]
    fn glob_matches_path_style_wildcards() {
        let rule = MatchRule::glob("listener:*_test");
        assert!(rule.matches("listener:path_test").unwrap());
        assert!(!rule.matches("listener:path-test").unwrap());
    }

    #[test]
    fn regex_matches_character_classes() {
        let rule = MatchRule::regex("listener:[a-z]+[_-]test");
        assert!(rule.matches("listener:regex-test").unwrap());
        assert!(!rule.matches("listener:01_test").unwrap());
    }

    #[test]
    fn malformed_patterns_error_at_evaluation() {
        assert!(matches!(
            MatchRule::regex("a[").matches("a1"),
            Err(MatchError::Regex { .. })
        ));
        assert!(matches!(
            MatchRule::glob("a[").matches("a1"),
            Err(MatchError::Glob { .. })
        ));
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in [RuleKind::Exact, RuleKind::Glob, RuleKind::Regex] {
            assert_eq!(RuleKind::from_code(kind.code()).unwrap(), kind);
        }
        assert!(matches!(
            RuleKind::from_code(0),
            Err(DispatchError::InvalidRuleKind { code: 0 })
        ));
        assert!(matches!(
            RuleKind::from_code(4),
            Err(DispatchError::InvalidRuleKind { code: 4 })
        ));
    }
}
