//! Call identifiers.
//!
//! The server uses the call id to detect duplicate or out-of-order requests. Every id
//! handed out by a [`CallCounter`] is one greater than the last; increments are atomic,
//! so a counter shared across tasks never issues the same id twice.

use std::sync::atomic::{AtomicU64, Ordering};

/// First id issued to requests that carry no session.
///
/// Kept well above the per-session range so generic calls never collide with a session's
/// early call ids.
pub const GENERIC_CALL_ID_SEED: u64 = 10_000;

/// First id issued within a session.
pub const SESSION_CALL_ID_SEED: u64 = 1;

/// Monotonic call id source.
#[derive(Debug)]
pub struct CallCounter {
    next: AtomicU64,
}

impl CallCounter {
    /// Counter whose first [`next_id`](Self::next_id) returns `seed`.
    pub fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Process-wide counter for session-less requests, seeded at [`GENERIC_CALL_ID_SEED`].
    pub fn generic() -> Self {
        Self::starting_at(GENERIC_CALL_ID_SEED)
    }

    /// Per-session counter, seeded at [`SESSION_CALL_ID_SEED`].
    pub fn for_session() -> Self {
        Self::starting_at(SESSION_CALL_ID_SEED)
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The id the next allocation will return, without consuming it.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}
