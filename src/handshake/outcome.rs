//! Results reported by successful pushes.

use crate::record::Record;

/// Counters describing what one push did to the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PushReport {
    pub(super) fragments: usize,
    pub(super) stale_fragments: usize,
    pub(super) new_bytes: usize,
    pub(super) opened: usize,
    pub(super) completed: usize,
}

impl PushReport {
    /// Fragments parsed from the payload, stale ones included.
    #[must_use]
    pub const fn fragments(&self) -> usize { self.fragments }

    /// Fragments for messages already handed out, which were dropped.
    #[must_use]
    pub const fn stale_fragments(&self) -> usize { self.stale_fragments }

    /// Message body bytes received for the first time.
    #[must_use]
    pub const fn new_bytes(&self) -> usize { self.new_bytes }

    /// Messages whose first fragment arrived in this push.
    #[must_use]
    pub const fn opened_messages(&self) -> usize { self.opened }

    /// Messages that became ready to pop during this push.
    #[must_use]
    pub const fn completed_messages(&self) -> usize { self.completed }

    /// Report whether the push carried fragments but taught the buffer
    /// nothing new.
    ///
    /// Retransmission logic can use this to detect that the peer is
    /// resending a flight it already delivered.
    #[must_use]
    pub const fn is_retransmit(&self) -> bool {
        self.fragments > 0 && self.new_bytes == 0 && self.opened == 0 && self.completed == 0
    }

    pub(super) fn absorb(&mut self, other: Self) {
        self.fragments += other.fragments;
        self.stale_fragments += other.stale_fragments;
        self.new_bytes += other.new_bytes;
        self.opened += other.opened;
        self.completed += other.completed;
    }
}

/// Result of [`FragmentBuffer::push`](super::FragmentBuffer::push).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The record was not handshake content and was left for the caller.
    NotHandshake,
    /// The payload was merged into the buffer.
    Handshake(PushReport),
}

impl PushOutcome {
    /// Report whether the record was consumed by the buffer.
    #[must_use]
    pub const fn is_handshake(&self) -> bool { matches!(self, Self::Handshake(_)) }

    /// The push report for handshake records.
    #[must_use]
    pub const fn report(&self) -> Option<&PushReport> {
        match self {
            Self::Handshake(report) => Some(report),
            Self::NotHandshake => None,
        }
    }
}

/// Result of [`FragmentBuffer::push_datagram`](super::FragmentBuffer::push_datagram).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatagramOutcome<'a> {
    pub(super) handshake_records: usize,
    pub(super) report: PushReport,
    pub(super) passthrough: Vec<Record<'a>>,
    pub(super) trailing: &'a [u8],
}

impl<'a> DatagramOutcome<'a> {
    /// Report whether any record in the datagram carried handshake content.
    #[must_use]
    pub const fn is_handshake(&self) -> bool { self.handshake_records > 0 }

    /// Number of handshake records merged.
    #[must_use]
    pub const fn handshake_records(&self) -> usize { self.handshake_records }

    /// Combined report across every handshake record.
    #[must_use]
    pub const fn report(&self) -> &PushReport { &self.report }

    /// Records of other content types, in datagram order.
    #[must_use]
    pub fn passthrough(&self) -> &[Record<'a>] { &self.passthrough }

    /// Consume the outcome, returning the non-handshake records.
    #[must_use]
    pub fn into_passthrough(self) -> Vec<Record<'a>> { self.passthrough }

    /// Trailing bytes too short to form another record header.
    #[must_use]
    pub const fn trailing(&self) -> &'a [u8] { self.trailing }
}
