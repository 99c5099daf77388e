//! Error types emitted by handshake fragment parsing and buffering.
//!
//! Every variant carries the values that triggered it so rejections can be
//! logged and asserted on precisely.

use std::num::NonZeroUsize;

use thiserror::Error;

use super::{HandshakeType, MessageSequence};
use crate::record::RecordError;

/// Malformed handshake fragment framing inside a record payload.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// Fewer bytes than a fragment header were supplied to
    /// [`FragmentHeader::parse`](super::FragmentHeader::parse).
    #[error("truncated fragment header: have {have}, need {need}")]
    TruncatedHeader {
        /// Bytes available.
        have: usize,
        /// Bytes required for a complete header.
        need: usize,
    },
    /// `offset + fragment_length` exceeds the declared message length.
    #[error(
        "fragment of message {message_seq} out of bounds: offset {offset} + length \
         {fragment_length} > total {total}"
    )]
    FragmentOutOfBounds {
        /// Message the fragment claims to belong to.
        message_seq: MessageSequence,
        /// Declared fragment offset.
        offset: u32,
        /// Declared fragment length.
        fragment_length: u32,
        /// Declared message length.
        total: u32,
    },
    /// The fragment declares more body bytes than the record payload holds.
    #[error(
        "fragment of message {message_seq} overruns record payload: declared {declared} \
         bytes, {available} available"
    )]
    BodyOverrun {
        /// Message the fragment claims to belong to.
        message_seq: MessageSequence,
        /// Declared fragment length.
        declared: usize,
        /// Bytes remaining after the fragment header.
        available: usize,
    },
}

/// Coarse classification of [`BufferError`] used for logging and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A header was truncated or a length field disagreed with the bytes
    /// available.
    Malformed,
    /// A fragment disagreed with an earlier fragment of the same message.
    SequenceMismatch,
    /// Admitting the data would exceed the buffered byte cap.
    Overflow,
}

impl ErrorKind {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::SequenceMismatch => "sequence_mismatch",
            Self::Overflow => "overflow",
        }
    }
}

/// Errors returned by [`FragmentBuffer`](super::FragmentBuffer).
///
/// A push that fails with any of these leaves the buffer unchanged.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Record framing was malformed.
    #[error("malformed record: {0}")]
    Record(#[from] RecordError),

    /// Handshake fragment framing was malformed.
    #[error("malformed handshake fragment: {0}")]
    Fragment(#[from] FragmentError),

    /// A fragment claimed a total length different from the first fragment
    /// seen for the same message.
    #[error("message {message_seq} total length mismatch: expected {expected}, found {found}")]
    TotalLengthMismatch {
        /// Message whose fragments disagree.
        message_seq: MessageSequence,
        /// Length fixed by the first fragment.
        expected: u32,
        /// Length claimed by the rejected fragment.
        found: u32,
    },

    /// A fragment claimed a message type different from the first fragment
    /// seen for the same message.
    #[error("message {message_seq} type mismatch: expected {expected}, found {found}")]
    MessageTypeMismatch {
        /// Message whose fragments disagree.
        message_seq: MessageSequence,
        /// Type fixed by the first fragment.
        expected: HandshakeType,
        /// Type claimed by the rejected fragment.
        found: HandshakeType,
    },

    /// Buffering the push would exceed the configured cap.
    #[error("fragment buffer overflow: {attempted} bytes > {limit} bytes")]
    Overflow {
        /// Buffered total the push would have produced.
        attempted: usize,
        /// Configured cap.
        limit: NonZeroUsize,
    },
}

impl BufferError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Record(_) | Self::Fragment(_) => ErrorKind::Malformed,
            Self::TotalLengthMismatch { .. } | Self::MessageTypeMismatch { .. } => {
                ErrorKind::SequenceMismatch
            }
            Self::Overflow { .. } => ErrorKind::Overflow,
        }
    }
}
