use bytes::Bytes;

use super::{FragmentHeader, HandshakeType, MessageSequence};
use crate::record::Epoch;

/// A fully reassembled handshake message.
///
/// The bytes are laid out exactly as an unfragmented message on the wire:
/// a 12-byte header with `fragment_offset = 0` and
/// `fragment_length = length`, followed by the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeMessage {
    header: FragmentHeader,
    epoch: Epoch,
    raw: Bytes,
}

impl HandshakeMessage {
    pub(crate) fn new(header: FragmentHeader, epoch: Epoch, raw: Bytes) -> Self {
        Self { header, epoch, raw }
    }

    /// Unfragmented header describing the message.
    #[must_use]
    pub const fn header(&self) -> &FragmentHeader { &self.header }

    /// Epoch of the record that carried the first fragment seen.
    #[must_use]
    pub const fn epoch(&self) -> Epoch { self.epoch }

    /// Message sequence number.
    #[must_use]
    pub const fn message_seq(&self) -> MessageSequence { self.header.message_seq }

    /// Message type tag.
    #[must_use]
    pub const fn msg_type(&self) -> HandshakeType { self.header.msg_type }

    /// Message body without the header.
    #[must_use]
    pub fn body(&self) -> &[u8] { &self.raw[FragmentHeader::LEN..] }

    /// Header and body as they would appear on the wire.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.raw }

    /// Consume the message, returning the owned wire bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes { self.raw }
}

impl AsRef<[u8]> for HandshakeMessage {
    fn as_ref(&self) -> &[u8] { self.as_bytes() }
}
