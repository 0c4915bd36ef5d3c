use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::event::Event;
use crate::matcher::MatchError;

/// One listener whose rule failed to evaluate during a delivery pass.
///
/// The index is the listener's registration position at the time of the pass.
#[derive(Debug)]
pub struct ListenerMatchFailure {
    pub index: usize,
    pub error: MatchError,
}

impl fmt::Display for ListenerMatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener {}: {}", self.index, self.error)
    }
}

/// Errors returned by dispatcher operations.
///
/// Composite operations wrap the failing sub-operation ([`Subordinate`],
/// [`Processing`]); use [`root_cause`](DispatchError::root_cause) to unwrap
/// a chain down to the error that started it.
///
/// [`Subordinate`]: DispatchError::Subordinate
/// [`Processing`]: DispatchError::Processing
#[derive(Debug, Error, Diagnostic)]
pub enum DispatchError {
    /// Indexed store access beyond the current length.
    #[error("index {index} out of range for event store of length {len}")]
    #[diagnostic(code(signalbus::store::index_out_of_range))]
    IndexOutOfRange { index: usize, len: usize },

    /// Pop or shift on an empty store.
    #[error("event store is empty")]
    #[diagnostic(code(signalbus::store::empty_queue))]
    EmptyQueue,

    /// Listener construction with an unrecognized rule kind code.
    #[error("unrecognized match rule kind code {code}")]
    #[diagnostic(code(signalbus::matcher::invalid_rule_kind))]
    InvalidRuleKind { code: i64 },

    /// One or more listener rules failed to evaluate during a delivery pass.
    ///
    /// Delivery to the remaining listeners still happened; the failures are
    /// aggregated here per listener index.
    #[error("rule evaluation failed for {} listener(s)", .failures.len())]
    #[diagnostic(code(signalbus::dispatch::match_failure))]
    Match { failures: Vec<ListenerMatchFailure> },

    /// A sub-operation of a composite operation failed.
    #[error("{context} failed")]
    #[diagnostic(code(signalbus::dispatch::subordinate))]
    Subordinate {
        context: &'static str,
        #[source]
        source: Box<DispatchError>,
    },

    /// A full delivery pass failed; carries the event that was being
    /// delivered and wraps the underlying match failure.
    #[error("delivery pass failed for event {:?}", .event.name())]
    #[diagnostic(code(signalbus::dispatch::processing))]
    Processing {
        event: Box<Event>,
        #[source]
        source: Box<DispatchError>,
    },
}

impl DispatchError {
    pub(crate) fn subordinate(context: &'static str, source: DispatchError) -> Self {
        DispatchError::Subordinate {
            context,
            source: Box::new(source),
        }
    }

    pub(crate) fn processing(event: Event, source: DispatchError) -> Self {
        DispatchError::Processing {
            event: Box::new(event),
            source: Box::new(source),
        }
    }

    /// Walk the wrapper chain to the error that started it.
    pub fn root_cause(&self) -> &DispatchError {
        match self {
            DispatchError::Subordinate { source, .. }
            | DispatchError::Processing { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Per-listener failures, if this (or its root cause) is a match-failure
    /// aggregate.
    pub fn match_failures(&self) -> Option<&[ListenerMatchFailure]> {
        match self.root_cause() {
            DispatchError::Match { failures } => Some(failures),
            _ => None,
        }
    }
}
