//! Errors raised while delimiting records inside a datagram.

use thiserror::Error;

/// Malformed record framing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Fewer bytes than a record header were supplied to
    /// [`RecordHeader::parse`](super::RecordHeader::parse).
    #[error("truncated record header: have {have}, need {need}")]
    TruncatedHeader {
        /// Bytes available.
        have: usize,
        /// Bytes required for a complete header.
        need: usize,
    },
    /// The header declares more payload than the datagram holds.
    #[error("record payload overruns datagram: declared {declared} bytes, {available} available")]
    PayloadOverrun {
        /// Payload length carried in the header.
        declared: usize,
        /// Bytes remaining after the header.
        available: usize,
    },
}
