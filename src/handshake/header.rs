use std::ops::Range;

use derive_more::{Display, From, Into};

use super::FragmentError;
use crate::byte_order::{read_network_u16, read_network_u24, write_network_u16, write_network_u24};

/// Handshake message type tag.
///
/// The reassembler treats the tag as opaque; the named constants exist for
/// readability in callers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct HandshakeType(u8);

impl HandshakeType {
    pub const HELLO_REQUEST: Self = Self(0);
    pub const CLIENT_HELLO: Self = Self(1);
    pub const SERVER_HELLO: Self = Self(2);
    pub const HELLO_VERIFY_REQUEST: Self = Self(3);
    pub const CERTIFICATE: Self = Self(11);
    pub const SERVER_KEY_EXCHANGE: Self = Self(12);
    pub const CERTIFICATE_REQUEST: Self = Self(13);
    pub const SERVER_HELLO_DONE: Self = Self(14);
    pub const CERTIFICATE_VERIFY: Self = Self(15);
    pub const CLIENT_KEY_EXCHANGE: Self = Self(16);
    pub const FINISHED: Self = Self(20);

    /// Wrap a raw tag.
    #[must_use]
    pub const fn new(tag: u8) -> Self { Self(tag) }

    /// Return the raw tag.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }
}

/// Peer-assigned ordinal of a logical handshake message.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::handshake::MessageSequence;
/// let seq = MessageSequence::new(2);
/// assert_eq!(seq.get(), 2);
/// assert!(MessageSequence::new(1) < seq);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0}")]
pub struct MessageSequence(u16);

impl MessageSequence {
    /// Wrap a raw sequence number.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }

    /// The following sequence number, or `None` at `u16::MAX`.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> { self.0.checked_add(1).map(Self) }
}

/// Fixed-size prefix of every handshake fragment.
///
/// Layout (big-endian): type (1) · total length (3) · message sequence (2) ·
/// fragment offset (3) · fragment length (3). Length fields are 24-bit on the
/// wire and carried as `u32`.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::handshake::{FragmentHeader, HandshakeType, MessageSequence};
///
/// let header = FragmentHeader {
///     msg_type: HandshakeType::CERTIFICATE,
///     length: 15,
///     message_seq: MessageSequence::new(0),
///     fragment_offset: 5,
///     fragment_length: 5,
/// };
/// let wire = header.encode().expect("fields fit");
/// assert_eq!(FragmentHeader::parse(&wire), Ok(header));
/// assert_eq!(header.fragment_range(), 5..10);
/// assert!(header.unfragmented().is_unfragmented());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHeader {
    /// Message type tag.
    pub msg_type: HandshakeType,
    /// Total length of the reassembled message body.
    pub length: u32,
    /// Sequence of the message this fragment belongs to.
    pub message_seq: MessageSequence,
    /// Offset of this fragment's bytes within the message body.
    pub fragment_offset: u32,
    /// Number of body bytes carried by this fragment.
    pub fragment_length: u32,
}

impl FragmentHeader {
    /// Encoded size of a fragment header.
    pub const LEN: usize = 12;

    /// Parse a header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TruncatedHeader`] for fewer than
    /// [`FragmentHeader::LEN`] bytes and [`FragmentError::FragmentOutOfBounds`]
    /// when `offset + fragment_length` exceeds the declared total.
    pub fn parse(bytes: &[u8]) -> Result<Self, FragmentError> {
        let Some(raw) = bytes.first_chunk::<{ FragmentHeader::LEN }>() else {
            return Err(FragmentError::TruncatedHeader {
                have: bytes.len(),
                need: Self::LEN,
            });
        };
        let [tag, t0, t1, t2, q0, q1, o0, o1, o2, f0, f1, f2] = *raw;

        let header = Self {
            msg_type: HandshakeType(tag),
            length: read_network_u24([t0, t1, t2]),
            message_seq: MessageSequence(read_network_u16([q0, q1])),
            fragment_offset: read_network_u24([o0, o1, o2]),
            fragment_length: read_network_u24([f0, f1, f2]),
        };
        // Both operands are 24-bit so the sum cannot overflow `u32`.
        if header.fragment_offset + header.fragment_length > header.length {
            return Err(FragmentError::FragmentOutOfBounds {
                message_seq: header.message_seq,
                offset: header.fragment_offset,
                fragment_length: header.fragment_length,
                total: header.length,
            });
        }
        Ok(header)
    }

    /// Encode the header into its wire representation.
    ///
    /// Returns `None` when a length field does not fit in 24 bits.
    #[must_use]
    pub fn encode(&self) -> Option<[u8; Self::LEN]> {
        let [t0, t1, t2] = write_network_u24(self.length)?;
        let [q0, q1] = write_network_u16(self.message_seq.get());
        let [o0, o1, o2] = write_network_u24(self.fragment_offset)?;
        let [f0, f1, f2] = write_network_u24(self.fragment_length)?;
        Some([
            self.msg_type.get(),
            t0,
            t1,
            t2,
            q0,
            q1,
            o0,
            o1,
            o2,
            f0,
            f1,
            f2,
        ])
    }

    /// Copy of this header describing the whole message as one fragment.
    #[must_use]
    pub const fn unfragmented(&self) -> Self {
        Self {
            fragment_offset: 0,
            fragment_length: self.length,
            ..*self
        }
    }

    /// Report whether this header already describes the whole message.
    #[must_use]
    pub const fn is_unfragmented(&self) -> bool {
        self.fragment_offset == 0 && self.fragment_length == self.length
    }

    /// Byte range of the message body covered by this fragment.
    #[must_use]
    pub const fn fragment_range(&self) -> Range<u32> {
        self.fragment_offset..self.fragment_offset + self.fragment_length
    }
}
