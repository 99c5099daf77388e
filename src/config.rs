//! Configuration for [`FragmentBuffer`](crate::handshake::FragmentBuffer).
//!
//! The only resource knob is the cap on buffered message bytes. The
//! completion policy decides how a message whose sole fragment is empty is
//! treated.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default cap on buffered handshake bytes.
pub const DEFAULT_MAX_BUFFERED_BYTES: NonZeroUsize = match NonZeroUsize::new(2_000_000) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Rule used to decide when a message is ready to pop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// A message is complete only once received fragments cover every byte
    /// of its body.
    #[default]
    Strict,
    /// As [`Strict`](Self::Strict), and additionally a message whose only
    /// fragment so far is a zero-length fragment at offset zero is complete.
    /// The missing body bytes are handed out as zeros.
    ///
    /// This reproduces the behaviour older peers and test vectors rely on.
    LegacyZeroLength,
}

/// Settings for a fragment buffer.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use handshake_reassembly::config::{BufferConfig, CompletionPolicy};
///
/// let config = BufferConfig::default()
///     .with_max_buffered_bytes(NonZeroUsize::new(64 * 1024).expect("non-zero"))
///     .with_completion(CompletionPolicy::LegacyZeroLength);
/// assert_eq!(config.max_buffered_bytes.get(), 65_536);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Hard cap on bytes held across all buffered messages, complete or not.
    pub max_buffered_bytes: NonZeroUsize,
    /// When a message counts as complete.
    pub completion: CompletionPolicy,
}

impl BufferConfig {
    /// Replace the buffered byte cap.
    #[must_use]
    pub const fn with_max_buffered_bytes(mut self, limit: NonZeroUsize) -> Self {
        self.max_buffered_bytes = limit;
        self
    }

    /// Replace the completion policy.
    #[must_use]
    pub const fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_buffered_bytes: DEFAULT_MAX_BUFFERED_BYTES,
            completion: CompletionPolicy::default(),
        }
    }
}
