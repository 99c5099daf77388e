//! Per-message assembly state.

use bytes::BytesMut;

use super::{Coverage, FragmentHeader, HandshakeMessage, HandshakeType};
use crate::{config::CompletionPolicy, record::Epoch};

/// Reassembly state for one message sequence number.
///
/// The destination buffer reserves room for the message header so the
/// completed message can be frozen in place without another copy.
#[derive(Debug)]
pub(super) struct AssemblySlot {
    /// Header of the first fragment, as parsed off the wire.
    header: FragmentHeader,
    epoch: Epoch,
    buffer: BytesMut,
    coverage: Coverage,
    legacy_ready: bool,
}

impl AssemblySlot {
    /// Create a slot from the first fragment observed for its message.
    pub(super) fn new(header: &FragmentHeader, epoch: Epoch) -> Self {
        let body_len = header.length as usize;
        Self {
            header: *header,
            epoch,
            buffer: BytesMut::zeroed(FragmentHeader::LEN + body_len),
            coverage: Coverage::new(),
            legacy_ready: false,
        }
    }

    pub(super) const fn msg_type(&self) -> HandshakeType { self.header.msg_type }

    pub(super) const fn total(&self) -> u32 { self.header.length }

    /// Bytes charged against the buffer cap for this slot.
    pub(super) const fn charge(&self) -> usize {
        FragmentHeader::LEN + self.header.length as usize
    }

    /// Copy a fragment body into place, returning how many bytes were newly
    /// covered.
    ///
    /// The caller has already checked that the fragment lies within the
    /// message and that `body.len()` equals the declared fragment length,
    /// and never merges into a slot that is already complete.
    pub(super) fn merge(&mut self, header: &FragmentHeader, body: &[u8]) -> u32 {
        let range = header.fragment_range();
        let start = FragmentHeader::LEN + range.start as usize;
        self.buffer[start..start + body.len()].copy_from_slice(body);

        // An empty fragment at the origin of a body nothing else has touched.
        if header.fragment_length == 0
            && header.fragment_offset == 0
            && self.coverage.covered_len() == 0
        {
            self.legacy_ready = true;
        }
        self.coverage.insert(range)
    }

    /// Report whether the message can be handed out under `policy`.
    ///
    /// Once true this stays true: complete slots receive no further merges.
    pub(super) fn is_complete(&self, policy: CompletionPolicy) -> bool {
        if self.coverage.covers(self.header.length) {
            return true;
        }
        match policy {
            CompletionPolicy::Strict => false,
            CompletionPolicy::LegacyZeroLength => self.legacy_ready,
        }
    }

    /// Write the unfragmented header in front of the body and hand the bytes
    /// out.
    pub(super) fn into_message(self) -> HandshakeMessage {
        let header = self.header.unfragmented();
        let mut buffer = self.buffer;
        let encoded = header.encode();
        debug_assert!(
            encoded.is_some(),
            "header parsed from 24-bit fields must re-encode"
        );
        if let Some(encoded) = encoded {
            buffer[..FragmentHeader::LEN].copy_from_slice(&encoded);
        }
        HandshakeMessage::new(header, self.epoch, buffer.freeze())
    }
}
