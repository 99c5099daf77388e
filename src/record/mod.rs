//! Record-layer framing for inbound datagrams.
//!
//! A single datagram may carry several records back to back. Each record
//! starts with a fixed 13-byte [`RecordHeader`] followed by `length` payload
//! bytes. [`RecordSplitter`] walks a datagram and yields each record's
//! header and borrowed payload without copying.

pub mod content_type;
pub mod error;
pub mod header;
pub mod splitter;

pub use content_type::ContentType;
pub use error::RecordError;
pub use header::{Epoch, ProtocolVersion, RecordHeader, RecordSequence};
pub use splitter::{Record, RecordSplitter};
