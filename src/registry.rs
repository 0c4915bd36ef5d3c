use crate::listener::Listener;

/// Ordered sequence of registered listeners.
///
/// Like the event store, this is unsynchronized and lives behind the
/// dispatcher's lock. Registration order is delivery order.
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Append a listener; returns the new count.
    pub(crate) fn add(&mut self, listener: Listener) -> usize {
        self.listeners.push(listener);
        self.listeners.len()
    }

    /// Remove every listener whose rule pattern equals `literal`; returns the
    /// new count. `retain` compacts in place and cannot skip or double-visit
    /// consecutive matches.
    pub(crate) fn remove_by_literal(&mut self, literal: &str) -> usize {
        self.listeners
            .retain(|listener| listener.rule().pattern() != literal);
        self.listeners.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.listeners.iter()
    }
}
