//! Builders for handshake records and fragments.

use bytes::{BufMut, Bytes, BytesMut};
use handshake_reassembly::{
    handshake::{FragmentHeader, HandshakeType, MessageSequence},
    record::{ContentType, Epoch, ProtocolVersion, RecordHeader, RecordSequence},
};

/// Encode a single fragment of a message `total` bytes long.
///
/// # Panics
///
/// Panics if a length does not fit in 24 bits.
#[must_use]
pub fn fragment(msg_type: u8, total: u32, seq: u16, offset: u32, body: &[u8]) -> Bytes {
    let header = FragmentHeader {
        msg_type: HandshakeType::new(msg_type),
        length: total,
        message_seq: MessageSequence::new(seq),
        fragment_offset: offset,
        fragment_length: u32::try_from(body.len()).expect("body length fits in u32"),
    };
    let mut out = BytesMut::with_capacity(FragmentHeader::LEN + body.len());
    out.put_slice(&header.encode().expect("fragment fields fit in 24 bits"));
    out.put_slice(body);
    out.freeze()
}

/// Split `body` into fragments carrying at most `max_fragment` bytes each.
///
/// An empty body yields a single empty fragment.
///
/// # Panics
///
/// Panics if `max_fragment` is zero or the body exceeds 24 bits.
#[must_use]
pub fn fragment_message(msg_type: u8, seq: u16, body: &[u8], max_fragment: usize) -> Vec<Bytes> {
    assert!(max_fragment > 0, "fragments must carry at least one byte");
    let total = u32::try_from(body.len()).expect("body length fits in u32");
    if body.is_empty() {
        return vec![fragment(msg_type, 0, seq, 0, &[])];
    }
    body.chunks(max_fragment)
        .enumerate()
        .map(|(index, chunk)| {
            let offset = u32::try_from(index * max_fragment).expect("offset fits in u32");
            fragment(msg_type, total, seq, offset, chunk)
        })
        .collect()
}

/// Encode one DTLS 1.2 record carrying `payload`.
///
/// # Panics
///
/// Panics if `payload` is longer than `u16::MAX`.
#[must_use]
pub fn record(content_type: ContentType, epoch: u16, payload: &[u8]) -> Bytes {
    let header = RecordHeader {
        content_type,
        version: ProtocolVersion::DTLS_1_2,
        epoch: Epoch::new(epoch),
        sequence: RecordSequence::default(),
        length: u16::try_from(payload.len()).expect("payload fits in a record"),
    };
    let mut out = BytesMut::with_capacity(RecordHeader::LEN + payload.len());
    out.put_slice(&header.encode());
    out.put_slice(payload);
    out.freeze()
}

/// Encode a handshake record.
#[must_use]
pub fn handshake_record(epoch: u16, payload: &[u8]) -> Bytes {
    record(ContentType::Handshake, epoch, payload)
}

/// Concatenate records into one datagram.
#[must_use]
pub fn datagram<I, B>(records: I) -> Bytes
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut out = BytesMut::new();
    for record in records {
        out.put_slice(record.as_ref());
    }
    out.freeze()
}
