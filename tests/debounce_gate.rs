// tests/debounce_gate.rs

use std::time::{Duration, Instant};

use proptest::prelude::*;

use lovewatch::types::{ChangeEvent, OperationKind};
use lovewatch::watch::{should_trigger, DebounceGate, RelevantExtensionSet, DEFAULT_DEBOUNCE};

#[test]
fn default_window_is_half_a_second() {
    assert_eq!(DEFAULT_DEBOUNCE, Duration::from_millis(500));
    assert_eq!(DebounceGate::default().window(), DEFAULT_DEBOUNCE);
}

#[test]
fn first_relevant_write_always_fires() {
    let set = RelevantExtensionSet::default();
    let now = Instant::now();

    let (fire, last) = should_trigger(&ChangeEvent::write("main.lua"), now, None, DEFAULT_DEBOUNCE, &set);

    assert!(fire);
    assert_eq!(last, Some(now));
}

#[test]
fn create_remove_rename_never_fire_even_when_relevant() {
    let set = RelevantExtensionSet::default();
    let now = Instant::now();

    for op in [OperationKind::Create, OperationKind::Remove, OperationKind::Rename] {
        let event = ChangeEvent::new("main.lua", op);
        let (fire, last) = should_trigger(&event, now, None, DEFAULT_DEBOUNCE, &set);
        assert!(!fire, "{op} must not trigger");
        assert_eq!(last, None, "{op} must not touch the timestamp");
    }
}

#[test]
fn irrelevant_write_does_not_fire_or_update_timestamp() {
    let mut gate = DebounceGate::default();
    let now = Instant::now();

    assert!(!gate.check(&ChangeEvent::write("notes.txt"), now));
    assert_eq!(gate.last_trigger(), None);
}

#[test]
fn writes_inside_window_are_suppressed() {
    let mut gate = DebounceGate::default();
    let t0 = Instant::now();

    assert!(gate.check(&ChangeEvent::write("main.lua"), t0));
    assert!(!gate.check(&ChangeEvent::write("main.lua"), t0 + Duration::from_millis(10)));
    assert!(!gate.check(&ChangeEvent::write("src/a.lua"), t0 + Duration::from_millis(499)));
    assert_eq!(gate.last_trigger(), Some(t0));
}

#[test]
fn window_boundary_is_exclusive() {
    let mut gate = DebounceGate::default();
    let t0 = Instant::now();

    assert!(gate.check(&ChangeEvent::write("main.lua"), t0));
    assert!(!gate.check(&ChangeEvent::write("main.lua"), t0 + DEFAULT_DEBOUNCE));
    assert!(gate.check(
        &ChangeEvent::write("main.lua"),
        t0 + DEFAULT_DEBOUNCE + Duration::from_millis(1)
    ));
}

#[test]
fn suppressed_events_do_not_extend_the_window() {
    let mut gate = DebounceGate::default();
    let t0 = Instant::now();

    assert!(gate.check(&ChangeEvent::write("main.lua"), t0));
    assert!(!gate.check(&ChangeEvent::write("main.lua"), t0 + Duration::from_millis(400)));
    // 600ms after the accepted trigger, only 200ms after the suppressed one.
    assert!(gate.check(&ChangeEvent::write("main.lua"), t0 + Duration::from_millis(600)));
}

fn event_strategy() -> impl Strategy<Value = ChangeEvent> {
    let path = prop_oneof![
        Just("main.lua"),
        Just("src/player.lua"),
        Just("assets/hero.png"),
        Just("README.md"),
        Just("main.lua~"),
    ];
    let op = prop_oneof![
        4 => Just(OperationKind::Write),
        1 => Just(OperationKind::Create),
        1 => Just(OperationKind::Remove),
        1 => Just(OperationKind::Rename),
    ];
    (path, op).prop_map(|(p, op)| ChangeEvent::new(p, op))
}

proptest! {
    #[test]
    fn accepted_triggers_are_at_least_one_window_apart(
        steps in proptest::collection::vec((0u64..800, event_strategy()), 1..60),
    ) {
        let mut gate = DebounceGate::default();
        let mut now = Instant::now();
        let mut accepted: Vec<Instant> = Vec::new();
        let mut first_relevant_write_seen = false;

        for (gap_ms, event) in steps {
            now += Duration::from_millis(gap_ms);
            let fired = gate.check(&event, now);

            if fired {
                prop_assert_eq!(event.op, OperationKind::Write);
                prop_assert!(gate.relevant().is_relevant(&event));
                accepted.push(now);
            }

            let relevant_write = event.op == OperationKind::Write && gate.relevant().is_relevant(&event);
            if relevant_write && !first_relevant_write_seen {
                prop_assert!(fired, "first relevant write must fire");
                first_relevant_write_seen = true;
            }
        }

        for pair in accepted.windows(2) {
            prop_assert!(pair[1].duration_since(pair[0]) >= DEFAULT_DEBOUNCE);
        }
    }
}
