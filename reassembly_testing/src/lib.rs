//! Helpers for exercising [`handshake_reassembly`] in tests and benchmarks.
//!
//! The builders encode records and fragments in wire format so tests can
//! describe datagrams by their parts rather than as raw byte arrays.
//!
//! ```rust
//! use handshake_reassembly::handshake::FragmentBuffer;
//! use reassembly_testing::{datagram, fragment_message, handshake_record};
//!
//! let records = fragment_message(11, 0, &[7; 40], 16)
//!     .into_iter()
//!     .map(|frag| handshake_record(0, &frag));
//! let wire = datagram(records);
//!
//! let mut buffer = FragmentBuffer::default();
//! buffer.push_datagram(&wire).expect("valid datagram");
//! assert_eq!(buffer.pop().expect("complete").body(), &[7; 40]);
//! ```

pub mod logging;
pub mod wire;

pub use logging::{LoggerHandle, logger};
pub use wire::{datagram, fragment, fragment_message, handshake_record, record};
