#![forbid(unsafe_code)]

//! Process-unique identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Next value of the process-wide counter. Never returns 0.
#[must_use]
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Prefixed string id such as `blocks-modal-17`.
#[must_use]
pub fn prefixed(prefix: &str) -> String {
    format!("{prefix}-{}", next_id())
}
