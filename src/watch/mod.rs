// src/watch/mod.rs

//! File watching and change classification.
//!
//! - [`relevance`] decides which paths matter (by suffix).
//! - [`debounce`] coalesces bursts of writes into a single trigger.
//! - [`watcher`] wires up the `notify` subscription and forwards
//!   `ChangeEvent`s into the runtime channel.
//!
//! Nothing here builds archives or touches processes.

pub mod debounce;
pub mod path_utils;
pub mod relevance;
pub mod watcher;

pub use debounce::{should_trigger, DebounceGate, DEFAULT_DEBOUNCE};
pub use relevance::{RelevantExtensionSet, DEFAULT_EXTENSIONS};
pub use watcher::{spawn_watcher, watch_directories, WatcherHandle};
