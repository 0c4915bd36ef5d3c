use crate::error::DispatchError;
use crate::event::Event;

/// Ordered sequence of pending events.
///
/// Not synchronized; the dispatcher owns the only instance and touches it
/// under its lock.
#[derive(Debug, Default)]
pub(crate) struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clone the event at `index` without mutating the store.
    pub(crate) fn get(&self, index: usize) -> Result<Event, DispatchError> {
        self.events
            .get(index)
            .cloned()
            .ok_or(DispatchError::IndexOutOfRange {
                index,
                len: self.events.len(),
            })
    }

    /// Delete the event at `index`, preserving relative order; returns the
    /// new length.
    pub(crate) fn remove(&mut self, index: usize) -> Result<usize, DispatchError> {
        if index >= self.events.len() {
            return Err(DispatchError::IndexOutOfRange {
                index,
                len: self.events.len(),
            });
        }
        self.events.remove(index);
        Ok(self.events.len())
    }

    /// Get-then-remove; either step's failure is wrapped as a subordinate
    /// error.
    pub(crate) fn extract(&mut self, index: usize) -> Result<Event, DispatchError> {
        let event = self
            .get(index)
            .map_err(|source| DispatchError::subordinate("get_event", source))?;
        self.remove(index)
            .map_err(|source| DispatchError::subordinate("remove_event", source))?;
        Ok(event)
    }

    /// Splice `event` in before the current element at `index`, or append
    /// when `index` is past the end; returns the new length.
    pub(crate) fn insert_at(&mut self, event: Event, index: usize) -> usize {
        if index >= self.events.len() {
            self.events.push(event);
        } else {
            self.events.insert(index, event);
        }
        self.events.len()
    }

    pub(crate) fn push(&mut self, event: Event) -> usize {
        self.events.push(event);
        self.events.len()
    }

    /// Remove and return the most recently pushed event.
    pub(crate) fn pop(&mut self) -> Result<Event, DispatchError> {
        self.events.pop().ok_or(DispatchError::EmptyQueue)
    }

    /// FIFO head removal.
    pub(crate) fn shift(&mut self) -> Result<Event, DispatchError> {
        if self.events.is_empty() {
            return Err(DispatchError::EmptyQueue);
        }
        self.extract(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(names: &[&str]) -> EventStore {
        let mut store = EventStore::default();
        for name in names {
            store.push(Event::named(*name));
        }
        store
    }

    #[test]
    fn get_clones_without_mutation() {
        let store = store_of(&["a", "b"]);
        assert_eq!(store.get(1).unwrap().name(), "b");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_and_remove_report_out_of_range() {
        let mut store = store_of(&["a"]);
        assert!(matches!(
            store.get(1),
            Err(DispatchError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            store.remove(1),
            Err(DispatchError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut store = store_of(&["a", "b", "c"]);
        assert_eq!(store.remove(1).unwrap(), 2);
        assert_eq!(store.get(0).unwrap().name(), "a");
        assert_eq!(store.get(1).unwrap().name(), "c");
    }

    #[test]
    fn extract_on_empty_wraps_the_get_failure() {
        let mut store = EventStore::default();
        let err = store.extract(0).unwrap_err();
        assert!(matches!(err, DispatchError::Subordinate { context: "get_event", .. }));
        assert!(matches!(
            err.root_cause(),
            DispatchError::IndexOutOfRange { index: 0, len: 0 }
        ));
    }

    #[test]
    fn insert_past_end_appends() {
        let mut store = store_of(&["a"]);
        assert_eq!(store.insert_at(Event::named("z"), 10), 2);
        assert_eq!(store.get(1).unwrap().name(), "z");
    }

    #[test]
    fn insert_splices_before_index() {
        let mut store = store_of(&["a", "c"]);
        store.insert_at(Event::named("b"), 1);
        let order: Vec<_> = (0..3).map(|i| store.get(i).unwrap().name().to_owned()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn pop_and_shift_report_empty_queue() {
        let mut store = EventStore::default();
        assert!(matches!(store.pop(), Err(DispatchError::EmptyQueue)));
        assert!(matches!(store.shift(), Err(DispatchError::EmptyQueue)));
    }

    #[test]
    fn shift_is_fifo_pop_is_lifo() {
        let mut store = store_of(&["a", "b", "c"]);
        assert_eq!(store.shift().unwrap().name(), "a");
        assert_eq!(store.pop().unwrap().name(), "c");
        assert_eq!(store.shift().unwrap().name(), "b");
        assert!(store.is_empty());
    }
}
