//! Iterator that delimits the records packed into one datagram.

use std::iter::FusedIterator;

use log::debug;

use super::{RecordError, RecordHeader};

/// One record delimited inside a datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    /// Parsed fixed header.
    pub header: RecordHeader,
    /// Payload bytes declared by `header.length`.
    pub payload: &'a [u8],
}

/// Walks a datagram yielding each contained [`Record`].
///
/// Iteration stops cleanly when fewer than [`RecordHeader::LEN`] bytes remain;
/// those bytes are exposed through [`RecordSplitter::remainder`] rather than
/// reported as an error. A header whose declared payload overruns the
/// datagram yields one [`RecordError::PayloadOverrun`], after which the
/// iterator is exhausted.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::record::{ContentType, RecordSplitter};
///
/// let datagram = [
///     0x17, 0xfe, 0xfd, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2, 0xaa, 0xbb, // record
///     0x00, 0x01, // trailing padding
/// ];
/// let mut splitter = RecordSplitter::new(&datagram);
/// let record = splitter.next().expect("one record").expect("well formed");
/// assert_eq!(record.header.content_type, ContentType::ApplicationData);
/// assert_eq!(record.payload, &[0xaa, 0xbb]);
/// assert!(splitter.next().is_none());
/// assert_eq!(splitter.remainder(), &[0x00, 0x01]);
/// ```
#[derive(Clone, Debug)]
pub struct RecordSplitter<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> RecordSplitter<'a> {
    /// Start splitting `datagram`.
    #[must_use]
    pub const fn new(datagram: &'a [u8]) -> Self {
        Self {
            rest: datagram,
            failed: false,
        }
    }

    /// Bytes not yet consumed.
    ///
    /// Once iteration has finished without error this is the trailing data
    /// too short to hold another record header.
    #[must_use]
    pub const fn remainder(&self) -> &'a [u8] { self.rest }
}

impl<'a> Iterator for RecordSplitter<'a> {
    type Item = Result<Record<'a>, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        if self.rest.len() < RecordHeader::LEN {
            debug!(
                "ignoring trailing datagram bytes shorter than a record header: len={}",
                self.rest.len()
            );
            return None;
        }

        let header = match RecordHeader::parse(self.rest) {
            Ok(header) => header,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };
        let body = &self.rest[RecordHeader::LEN..];
        let declared = usize::from(header.length);
        let Some((payload, rest)) = body.split_at_checked(declared) else {
            self.failed = true;
            return Some(Err(RecordError::PayloadOverrun {
                declared,
                available: body.len(),
            }));
        };

        self.rest = rest;
        Some(Ok(Record { header, payload }))
    }
}

impl FusedIterator for RecordSplitter<'_> {}
