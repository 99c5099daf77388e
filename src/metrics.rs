//! Metric helpers for handshake reassembly.
//!
//! This module defines metric names and thin wrappers around the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! every helper compiles to a no-op.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

use crate::handshake::ErrorKind;

/// Name of the counter tracking parsed handshake fragments.
pub const FRAGMENTS_TOTAL: &str = "handshake_fragments_total";
/// Name of the counter tracking messages handed out by `pop`.
pub const MESSAGES_REASSEMBLED: &str = "handshake_messages_reassembled_total";
/// Name of the counter tracking rejected input.
pub const ERRORS_TOTAL: &str = "handshake_reassembly_errors_total";
/// Name of the gauge tracking bytes charged against the buffer cap.
pub const BUFFERED_BYTES: &str = "handshake_buffered_bytes";

/// What happened to a parsed fragment.
#[derive(Clone, Copy, Debug)]
pub enum FragmentOutcome {
    /// Merged into an assembly slot.
    Accepted,
    /// Dropped because its message was already handed out.
    Stale,
}

impl FragmentOutcome {
    #[cfg_attr(not(feature = "metrics"), expect(dead_code, reason = "only used as a label"))]
    fn as_str(self) -> &'static str {
        match self {
            FragmentOutcome::Accepted => "accepted",
            FragmentOutcome::Stale => "stale",
        }
    }
}

/// Record `count` fragments with the given outcome.
pub fn inc_fragments(outcome: FragmentOutcome, count: usize) {
    #[cfg(feature = "metrics")]
    if count > 0 {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        counter!(FRAGMENTS_TOTAL, "outcome" => outcome.as_str()).increment(count);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (outcome, count);
}

/// Record a message handed out to the caller.
pub fn inc_messages_reassembled() {
    #[cfg(feature = "metrics")]
    counter!(MESSAGES_REASSEMBLED).increment(1);
}

/// Record a rejected push.
pub fn inc_errors(kind: ErrorKind) {
    #[cfg(feature = "metrics")]
    counter!(ERRORS_TOTAL, "kind" => kind.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Publish the current buffered byte total.
pub fn set_buffered_bytes(bytes: usize) {
    #[cfg(feature = "metrics")]
    {
        #[expect(
            clippy::cast_precision_loss,
            reason = "gauges are f64; buffered totals stay far below 2^52"
        )]
        let value = bytes as f64;
        gauge!(BUFFERED_BYTES).set(value);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = bytes;
}
