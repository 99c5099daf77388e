#![doc(html_root_url = "https://docs.rs/handshake_reassembly/latest")]
//! Handshake fragment reassembly for datagram transports.
//!
//! Datagram transports deliver handshake fragments out of order, duplicated,
//! coalesced or truncated. This crate delimits the records inside a datagram,
//! splits handshake records into fragments and reassembles complete
//! handshake messages under a hard memory cap, releasing them in ascending
//! message sequence order together with the epoch they arrived under.
//!
//! ```
//! use handshake_reassembly::FragmentBuffer;
//!
//! let mut buffer = FragmentBuffer::default();
//! let datagram = [
//!     // record header: handshake, DTLS 1.2, epoch 0, sequence 0, 15 bytes
//!     0x16, 0xfe, 0xfd, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0x00, 0x0f,
//!     // fragment header: type 3, length 3, seq 0, offset 0, fragment length 3
//!     0x03, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 3,
//!     0xfe, 0xff, 0x00,
//! ];
//! let outcome = buffer.push_datagram(&datagram).expect("well-formed datagram");
//! assert!(outcome.is_handshake());
//!
//! let message = buffer.pop().expect("complete message");
//! assert_eq!(message.body(), &[0xfe, 0xff, 0x00]);
//! assert_eq!(message.epoch().get(), 0);
//! ```

pub mod byte_order;
pub mod config;
pub mod handshake;
pub mod metrics;
pub mod record;

pub use config::{BufferConfig, CompletionPolicy};
pub use handshake::{
    BufferError,
    DatagramOutcome,
    ErrorKind,
    FragmentBuffer,
    FragmentError,
    FragmentHeader,
    HandshakeMessage,
    HandshakeType,
    MessageSequence,
    PushOutcome,
    PushReport,
};
pub use record::{ContentType, Epoch, Record, RecordError, RecordHeader, RecordSplitter};
