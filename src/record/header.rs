use derive_more::{Display, From, Into};

use super::{ContentType, RecordError};
use crate::byte_order::{
    read_network_u16,
    read_network_u48,
    write_network_u16,
    write_network_u48,
};

/// Cryptographic context counter attached to every record.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::record::Epoch;
/// let epoch = Epoch::new(3);
/// assert_eq!(epoch.get(), 3);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0}")]
pub struct Epoch(u16);

impl Epoch {
    /// Wrap a raw epoch value.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the raw epoch value.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }
}

/// Protocol version bytes, passed through unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display("{major:#04x}{minor:02x}")]
pub struct ProtocolVersion {
    /// First version byte.
    pub major: u8,
    /// Second version byte.
    pub minor: u8,
}

impl ProtocolVersion {
    /// Version bytes used by DTLS 1.0 peers.
    pub const DTLS_1_0: Self = Self::new(0xfe, 0xff);
    /// Version bytes used by DTLS 1.2 peers.
    pub const DTLS_1_2: Self = Self::new(0xfe, 0xfd);

    /// Construct a version from its two wire bytes.
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self { Self { major, minor } }
}

/// 48-bit record-layer sequence number. Opaque to the reassembler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into)]
#[display("{_0}")]
pub struct RecordSequence(u64);

impl RecordSequence {
    /// Wrap a sequence number, returning `None` when it does not fit in 48
    /// bits.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value > crate::byte_order::U48_MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Return the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// Fixed-size prefix of every record.
///
/// Layout (big-endian): content type (1) · version (2) · epoch (2) ·
/// sequence (6) · payload length (2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    /// Content carried by the payload.
    pub content_type: ContentType,
    /// Opaque protocol version.
    pub version: ProtocolVersion,
    /// Epoch the record was sent under.
    pub epoch: Epoch,
    /// Opaque record sequence number.
    pub sequence: RecordSequence,
    /// Number of payload bytes following the header.
    pub length: u16,
}

impl RecordHeader {
    /// Encoded size of a record header.
    pub const LEN: usize = 13;

    /// Parse a header from the start of `bytes`.
    ///
    /// Only the header itself is validated; the caller decides whether
    /// enough payload follows.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::TruncatedHeader`] when fewer than
    /// [`RecordHeader::LEN`] bytes are supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use handshake_reassembly::record::{ContentType, RecordHeader};
    ///
    /// let bytes = [0x16, 0xfe, 0xfd, 0x00, 0x01, 0, 0, 0, 0, 0, 0x07, 0x00, 0x0c];
    /// let header = RecordHeader::parse(&bytes).expect("complete header");
    /// assert_eq!(header.content_type, ContentType::Handshake);
    /// assert_eq!(header.epoch.get(), 1);
    /// assert_eq!(header.sequence.get(), 7);
    /// assert_eq!(header.length, 12);
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordError> {
        let Some(raw) = bytes.first_chunk::<{ RecordHeader::LEN }>() else {
            return Err(RecordError::TruncatedHeader {
                have: bytes.len(),
                need: Self::LEN,
            });
        };
        let [tag, major, minor, e0, e1, s0, s1, s2, s3, s4, s5, l0, l1] = *raw;

        Ok(Self {
            content_type: ContentType::from(tag),
            version: ProtocolVersion::new(major, minor),
            epoch: Epoch::new(read_network_u16([e0, e1])),
            sequence: RecordSequence(read_network_u48([s0, s1, s2, s3, s4, s5])),
            length: read_network_u16([l0, l1]),
        })
    }

    /// Encode the header into its wire representation.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::LEN] {
        let [e0, e1] = write_network_u16(self.epoch.get());
        // `RecordSequence` cannot hold more than 48 bits.
        let [s0, s1, s2, s3, s4, s5] = write_network_u48(self.sequence.get()).unwrap_or([0xFF; 6]);
        let [l0, l1] = write_network_u16(self.length);
        [
            self.content_type.to_u8(),
            self.version.major,
            self.version.minor,
            e0,
            e1,
            s0,
            s1,
            s2,
            s3,
            s4,
            s5,
            l0,
            l1,
        ]
    }
}
