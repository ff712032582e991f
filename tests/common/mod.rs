#![allow(dead_code)]

pub use lovewatch_test_utils::archive::{entry_bytes as archive_entry, entry_names as archive_entries};
pub use lovewatch_test_utils::builders;
pub use lovewatch_test_utils::fake_process;
pub use lovewatch_test_utils::{init_tracing, wait_until, with_timeout};
