// src/watch/debounce.rs

//! Time-window coalescing of rebuild triggers.
//!
//! Editors often emit several writes for a single save. Only the first write
//! of such a burst is accepted; everything else inside the window is dropped.

use std::time::{Duration, Instant};

use crate::types::{ChangeEvent, OperationKind};
use crate::watch::relevance::RelevantExtensionSet;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Decide whether `event` fires a rebuild.
///
/// Fires only for relevant `Write` events arriving strictly more than
/// `window` after `last_trigger`. `None` means "never fired", so the first
/// qualifying event always fires. Returns the decision together with the
/// timestamp the caller must store.
pub fn should_trigger(
    event: &ChangeEvent,
    now: Instant,
    last_trigger: Option<Instant>,
    window: Duration,
    relevant: &RelevantExtensionSet,
) -> (bool, Option<Instant>) {
    // Create/remove/rename never trigger, even for relevant files.
    if event.op != OperationKind::Write || !relevant.is_relevant(event) {
        return (false, last_trigger);
    }

    match last_trigger {
        None => (true, Some(now)),
        Some(prev) if now.saturating_duration_since(prev) > window => (true, Some(now)),
        Some(_) => (false, last_trigger),
    }
}

/// Stateful wrapper around [`should_trigger`] that owns the last-trigger
/// timestamp.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    relevant: RelevantExtensionSet,
    window: Duration,
    last_trigger: Option<Instant>,
}

impl DebounceGate {
    pub fn new(relevant: RelevantExtensionSet, window: Duration) -> Self {
        Self {
            relevant,
            window,
            last_trigger: None,
        }
    }

    pub fn relevant(&self) -> &RelevantExtensionSet {
        &self.relevant
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    /// Check an event and, on fire, record `now` as the last trigger time
    /// before returning.
    pub fn check(&mut self, event: &ChangeEvent, now: Instant) -> bool {
        let (fire, last) = should_trigger(event, now, self.last_trigger, self.window, &self.relevant);
        self.last_trigger = last;
        fire
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(RelevantExtensionSet::default(), DEFAULT_DEBOUNCE)
    }
}
