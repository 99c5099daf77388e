//! Handshake fragment parsing and reassembly.
//!
//! Handshake records carry one or more fragments, each prefixed by a
//! [`FragmentHeader`] naming the message it belongs to and the byte range it
//! fills. [`FragmentBuffer`] stitches them back into whole
//! [`HandshakeMessage`]s regardless of arrival order, duplication or
//! interleaving, and releases them in ascending sequence order.

pub mod buffer;
pub mod coverage;
pub mod error;
pub mod header;
pub mod message;
pub mod outcome;
mod slot;
pub mod splitter;

pub use buffer::FragmentBuffer;
pub use coverage::Coverage;
pub use error::{BufferError, ErrorKind, FragmentError};
pub use header::{FragmentHeader, HandshakeType, MessageSequence};
pub use message::HandshakeMessage;
pub use outcome::{DatagramOutcome, PushOutcome, PushReport};
pub use splitter::{Fragment, FragmentSplitter};

#[cfg(test)]
mod tests;
