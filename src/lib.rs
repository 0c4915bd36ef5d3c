//! # Signalbus: In-process Pub/Sub Event Dispatcher
//!
//! Signalbus is a thread-safe, machine-local publish/subscribe bus. Producers
//! submit named [`Event`]s carrying arbitrary key-value payloads; consumers
//! register [`Listener`]s whose [`MatchRule`] (exact string, glob, or regex)
//! is evaluated against each event's name. Matching callbacks run either
//! inline in the publishing call or fire-and-forget on a spawned task.
//!
//! ## Core Concepts
//!
//! - **Events**: immutable-after-construction values with a name and a
//!   [`serde_json::Value`] payload map
//! - **Listeners**: (rule, delivery mode, callback) triples visited in
//!   registration order
//! - **Dispatcher**: one mutex over the event queue and the listener
//!   registry; all operations are safe to call from any thread
//! - **Modes**: immediate delivery on publish, or a buffered FIFO queue
//!   drained one event at a time
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use serde_json::json;
//! use signalbus::{Delivery, Event, EventDispatcher, Listener, MatchRule};
//!
//! let dispatcher = EventDispatcher::default();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! dispatcher.add_listener(Listener::new(
//!     MatchRule::glob("build:*"),
//!     Delivery::Blocking,
//!     move |event| sink.lock().unwrap().push(event.name().to_owned()),
//! ));
//!
//! dispatcher
//!     .publish(Event::named("build:done").with("warnings", json!(0)))
//!     .unwrap();
//! dispatcher.publish(Event::named("deploy:done")).unwrap();
//!
//! // Only the glob-matched event was delivered.
//! assert_eq!(seen.lock().unwrap().as_slice(), ["build:done"]);
//! ```
//!
//! ## Buffered Mode
//!
//! With `buffered = true`, [`EventDispatcher::publish`] enqueues instead of
//! delivering; [`EventDispatcher::process_next`] shifts the oldest event and
//! runs it through the same match-and-deliver pass. Draining is explicit and
//! single-stepped:
//!
//! ```
//! use signalbus::{Event, EventDispatcher};
//!
//! let queue = EventDispatcher::new(true, true);
//! queue.publish(Event::named("a")).unwrap();
//! queue.publish(Event::named("b")).unwrap();
//!
//! while queue.event_count() > 0 {
//!     let event = queue.process_next().unwrap();
//!     // Timestamping mode stamped the event on enqueue and on delivery.
//!     assert!(event.get(signalbus::SUBMISSION_TIME_KEY).is_some());
//!     assert!(event.get(signalbus::TRANSMISSION_TIME_KEY).is_some());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`DispatchError`] value; nothing panics. One listener's
//! malformed pattern never blocks delivery to the others: the failures are
//! aggregated per listener index in [`DispatchError::Match`], and composite
//! operations chain their causes ([`DispatchError::root_cause`]).
//!
//! ## Module Guide
//!
//! - [`event`] - Event values, payload map, timestamp keys
//! - [`matcher`] - Rule kinds and pattern evaluation
//! - [`listener`] - Listener construction and delivery modes
//! - [`dispatcher`] - The dispatcher itself
//! - [`error`] - The error taxonomy

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod listener;
pub mod matcher;

mod registry;
mod store;

pub use dispatcher::EventDispatcher;
pub use error::{DispatchError, ListenerMatchFailure};
pub use event::{
    CREATION_TIME_KEY, Event, EventPayload, SUBMISSION_TIME_KEY, TRANSMISSION_TIME_KEY,
};
pub use listener::{Delivery, Listener, ListenerCallback};
pub use matcher::{MatchError, MatchRule, RuleKind};
