#[macro_use]
extern crate proptest;

use proptest::prelude::prop;
use signalbus::{Event, EventDispatcher};

// Generators shared by the queue-order properties

fn event_names() -> impl proptest::strategy::Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("[a-z][a-z0-9:_-]{0,12}").unwrap(), 1..16)
}

proptest! {
    #[test]
    fn prop_shift_preserves_push_order(names in event_names()) {
        let queue = EventDispatcher::new(false, true);
        for name in &names {
            queue.push_event(Event::named(name.clone()));
        }

        let mut drained = Vec::new();
        while let Ok(event) = queue.shift_event() {
            drained.push(event.name().to_owned());
        }
        prop_assert_eq!(drained, names);
    }

    #[test]
    fn prop_pop_reverses_push_order(names in event_names()) {
        let queue = EventDispatcher::new(false, true);
        for name in &names {
            queue.push_event(Event::named(name.clone()));
        }

        let mut drained = Vec::new();
        while let Ok(event) = queue.pop_event() {
            drained.push(event.name().to_owned());
        }
        let mut expected = names;
        expected.reverse();
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn prop_insert_extract_restores_length(names in event_names(), index in 0usize..24) {
        let queue = EventDispatcher::new(false, true);
        for name in &names {
            queue.push_event(Event::named(name.clone()));
        }
        let before = queue.event_count();

        let probe = Event::named("probe");
        queue.insert_event_at(probe.clone(), index);

        // The probe landed at `index` or, past the end, at the tail.
        let landed = index.min(before);
        let extracted = queue.extract_event(landed).expect("extract probe");
        prop_assert_eq!(extracted, probe);
        prop_assert_eq!(queue.event_count(), before);

        // Relative order of the original events is untouched.
        let mut drained = Vec::new();
        while let Ok(event) = queue.shift_event() {
            drained.push(event.name().to_owned());
        }
        prop_assert_eq!(drained, names);
    }
}
