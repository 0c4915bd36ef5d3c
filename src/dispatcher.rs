use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{DispatchError, ListenerMatchFailure};
use crate::event::{Event, SUBMISSION_TIME_KEY, TRANSMISSION_TIME_KEY};
use crate::listener::Listener;
use crate::registry::ListenerRegistry;
use crate::store::EventStore;

/// Thread-safe pub/sub dispatcher with an optional buffered queue mode.
///
/// The dispatcher owns an ordered event store and an ordered listener
/// registry behind a single mutex; every public operation takes the lock for
/// its full body, so the two collections are never observed mid-mutation.
/// Events and listeners are moved in by value and only ever handed back out
/// as clones.
///
/// Two mode flags are fixed at construction:
///
/// - `add_timestamps`: stamp `submission_time` on enqueue and
///   `transmission_time` right before each delivery pass.
/// - `buffered`: [`publish`](Self::publish) enqueues instead of delivering;
///   events are drained one at a time with
///   [`process_next`](Self::process_next).
///
/// # Immediate mode
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use signalbus::{Delivery, Event, EventDispatcher, Listener, MatchRule};
///
/// let dispatcher = EventDispatcher::new(false, false);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// dispatcher.add_listener(Listener::new(
///     MatchRule::glob("job:*"),
///     Delivery::Blocking,
///     move |event| sink.lock().unwrap().push(event.name().to_owned()),
/// ));
///
/// dispatcher.publish(Event::named("job:started")).unwrap();
/// assert_eq!(seen.lock().unwrap().as_slice(), ["job:started"]);
/// ```
///
/// # Buffered mode
///
/// ```
/// use signalbus::{Event, EventDispatcher};
///
/// let queue = EventDispatcher::new(false, true);
/// queue.publish(Event::named("first")).unwrap();
/// queue.publish(Event::named("second")).unwrap();
/// assert_eq!(queue.event_count(), 2);
///
/// // Drain in FIFO order; each call delivers one event to matching listeners.
/// assert_eq!(queue.process_next().unwrap().name(), "first");
/// assert_eq!(queue.process_next().unwrap().name(), "second");
/// assert!(queue.process_next().is_err()); // queue is empty
/// ```
#[derive(Debug)]
pub struct EventDispatcher {
    add_timestamps: bool,
    buffered: bool,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    store: EventStore,
    registry: ListenerRegistry,
}

impl EventDispatcher {
    pub fn new(add_timestamps: bool, buffered: bool) -> Self {
        Self {
            add_timestamps,
            buffered,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn add_timestamps(&self) -> bool {
        self.add_timestamps
    }

    pub fn buffered(&self) -> bool {
        self.buffered
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("dispatcher state poisoned")
    }

    /// Register a listener; returns the new listener count.
    ///
    /// Listeners are visited in registration order during delivery.
    pub fn add_listener(&self, listener: Listener) -> usize {
        let mut guard = self.lock();
        let count = guard.registry.add(listener);
        debug!(listener_count = count, "listener registered");
        count
    }

    /// Remove every listener whose rule pattern equals `literal`; returns the
    /// new listener count.
    pub fn remove_listeners(&self, literal: &str) -> usize {
        let mut guard = self.lock();
        let count = guard.registry.remove_by_literal(literal);
        debug!(literal, listener_count = count, "listeners removed");
        count
    }

    pub fn listener_count(&self) -> usize {
        self.lock().registry.len()
    }

    /// Number of queued events. Check this before [`pop_event`](Self::pop_event)
    /// or [`shift_event`](Self::shift_event) to avoid the empty-queue error.
    pub fn event_count(&self) -> usize {
        self.lock().store.len()
    }

    /// Clone the queued event at `index` without mutating the queue.
    pub fn get_event(&self, index: usize) -> Result<Event, DispatchError> {
        self.lock().store.get(index)
    }

    /// Delete the queued event at `index`; returns the new queue length.
    pub fn remove_event(&self, index: usize) -> Result<usize, DispatchError> {
        self.lock().store.remove(index)
    }

    /// Remove and return the queued event at `index`.
    pub fn extract_event(&self, index: usize) -> Result<Event, DispatchError> {
        self.lock().store.extract(index)
    }

    /// Splice an event into the queue before `index` (append when `index` is
    /// past the end); returns the new queue length.
    pub fn insert_event_at(&self, mut event: Event, index: usize) -> usize {
        let mut guard = self.lock();
        if self.add_timestamps {
            event.stamp(SUBMISSION_TIME_KEY);
        }
        guard.store.insert_at(event, index)
    }

    /// Append an event to the queue regardless of mode; returns the new
    /// queue length.
    pub fn push_event(&self, mut event: Event) -> usize {
        let mut guard = self.lock();
        if self.add_timestamps {
            event.stamp(SUBMISSION_TIME_KEY);
        }
        let len = guard.store.push(event);
        debug!(queue_len = len, "event pushed");
        len
    }

    /// Remove and return the most recently pushed event, or
    /// [`DispatchError::EmptyQueue`].
    pub fn pop_event(&self) -> Result<Event, DispatchError> {
        self.lock().store.pop()
    }

    /// Remove and return the oldest queued event, or
    /// [`DispatchError::EmptyQueue`].
    pub fn shift_event(&self) -> Result<Event, DispatchError> {
        self.lock().store.shift()
    }

    /// Submit an event according to the dispatcher's mode.
    ///
    /// Buffered: append to the queue (stamping `submission_time` when
    /// enabled) without invoking any listener. Immediate: run one delivery
    /// pass now, under the lock, without touching the queue; per-listener
    /// match failures are aggregated in the returned error while delivery to
    /// the other listeners proceeds.
    pub fn publish(&self, mut event: Event) -> Result<(), DispatchError> {
        let mut guard = self.lock();
        if self.buffered {
            if self.add_timestamps {
                event.stamp(SUBMISSION_TIME_KEY);
            }
            let len = guard.store.push(event);
            debug!(queue_len = len, "event buffered");
            Ok(())
        } else {
            self.deliver(&guard.registry, &mut event)
        }
    }

    /// Run one delivery pass for `event`; a failing pass is wrapped as
    /// [`DispatchError::Processing`] carrying the event.
    pub fn process_event(&self, mut event: Event) -> Result<(), DispatchError> {
        let guard = self.lock();
        self.deliver(&guard.registry, &mut event)
            .map_err(|source| DispatchError::processing(event, source))
    }

    /// Drain one event: shift the oldest queued event and run it through a
    /// delivery pass; returns the processed event.
    ///
    /// The dispatcher does not loop. Drain a queue by calling this repeatedly
    /// until it reports the empty-queue failure (a
    /// [`DispatchError::Subordinate`] whose root cause is
    /// [`DispatchError::EmptyQueue`]).
    pub fn process_next(&self) -> Result<Event, DispatchError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut event = inner
            .store
            .shift()
            .map_err(|source| DispatchError::subordinate("shift_event", source))?;
        debug!(event = %event.name(), queue_len = inner.store.len(), "processing queued event");
        match self.deliver(&inner.registry, &mut event) {
            Ok(()) => Ok(event),
            Err(source) => Err(DispatchError::processing(event, source)),
        }
    }

    /// Match-and-deliver pass shared by the publish and process paths.
    ///
    /// Visits listeners in registration order; blocking callbacks run here
    /// with the lock held, spawned callbacks are fired onto the runtime and
    /// never awaited. A listener whose rule fails to evaluate is recorded and
    /// skipped; it never aborts delivery to the rest.
    fn deliver(&self, registry: &ListenerRegistry, event: &mut Event) -> Result<(), DispatchError> {
        if self.add_timestamps {
            event.stamp(TRANSMISSION_TIME_KEY);
        }
        let mut failures = Vec::new();
        for (index, listener) in registry.iter().enumerate() {
            match listener.rule().matches(event.name()) {
                Ok(true) => listener.invoke(event.clone()),
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        listener_index = index,
                        rule = listener.rule().pattern(),
                        %error,
                        "listener rule failed to evaluate"
                    );
                    failures.push(ListenerMatchFailure { index, error });
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Match { failures })
        }
    }
}

impl Default for EventDispatcher {
    /// Immediate-mode dispatcher without timestamping.
    fn default() -> Self {
        Self::new(false, false)
    }
}
