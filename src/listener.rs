use std::fmt;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::event::Event;
use crate::matcher::MatchRule;

/// Callback invoked with a clone of each matching event.
pub type ListenerCallback = Arc<dyn Fn(Event) + Send + Sync + 'static>;

/// How a listener's callback is invoked when its rule matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Run the callback inline in the publishing call, while the dispatcher
    /// lock is held. A slow callback stalls the rest of the delivery pass and
    /// every other dispatcher operation until it returns.
    Blocking,
    /// Fire-and-forget: run the callback on a spawned tokio task. The
    /// dispatcher never observes completion, so there is no backpressure and
    /// no error propagation back to the publisher. Requires an active tokio
    /// runtime at dispatch time.
    Spawned,
}

/// A registered (rule, delivery mode, callback) triple awaiting matching
/// events.
///
/// Listeners have no identity beyond their rule's pattern literal: removal
/// via [`EventDispatcher::remove_listeners`](crate::EventDispatcher::remove_listeners)
/// deletes every listener whose pattern equals the given literal.
#[derive(Clone)]
pub struct Listener {
    rule: MatchRule,
    delivery: Delivery,
    callback: ListenerCallback,
}

impl Listener {
    pub fn new(
        rule: MatchRule,
        delivery: Delivery,
        callback: impl Fn(Event) + Send + Sync + 'static,
    ) -> Self {
        Self {
            rule,
            delivery,
            callback: Arc::new(callback),
        }
    }

    /// Build a listener from a numeric rule kind code, rejecting codes
    /// outside the recognized range.
    pub fn from_parts(
        kind_code: i64,
        pattern: impl Into<String>,
        delivery: Delivery,
        callback: impl Fn(Event) + Send + Sync + 'static,
    ) -> Result<Self, DispatchError> {
        Ok(Self::new(
            MatchRule::from_code(kind_code, pattern)?,
            delivery,
            callback,
        ))
    }

    pub fn rule(&self) -> &MatchRule {
        &self.rule
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Invoke the callback with `event` according to the delivery mode.
    pub(crate) fn invoke(&self, event: Event) {
        match self.delivery {
            Delivery::Blocking => (self.callback)(event),
            Delivery::Spawned => {
                let callback = Arc::clone(&self.callback);
                tokio::spawn(async move { callback(event) });
            }
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("rule", &self.rule)
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::RuleKind;

    #[test]
    fn from_parts_accepts_recognized_codes() {
        let listener =
            Listener::from_parts(RuleKind::GLOB_CODE, "a:*", Delivery::Blocking, |_| {})
                .expect("valid kind code");
        assert_eq!(listener.rule().kind(), RuleKind::Glob);
        assert_eq!(listener.rule().pattern(), "a:*");
    }

    #[test]
    fn from_parts_rejects_unknown_codes() {
        let err = Listener::from_parts(9, "a:*", Delivery::Blocking, |_| {}).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidRuleKind { code: 9 }));
    }
}
