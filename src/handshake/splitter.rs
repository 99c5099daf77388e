//! Iterator over the handshake fragments packed into one record payload.

use std::iter::FusedIterator;

use super::{FragmentError, FragmentHeader};

/// One fragment delimited inside a record payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    /// Parsed fragment header.
    pub header: FragmentHeader,
    /// Exactly `header.fragment_length` body bytes.
    pub body: &'a [u8],
}

/// Walks a handshake record payload yielding each [`Fragment`].
///
/// Every step consumes the 12 header bytes plus the declared body, so the
/// cursor strictly advances even for zero-length fragments and iteration
/// ends after at most `payload.len() / 12` items. Trailing bytes too short for
/// another header end iteration without error and remain available through
/// [`FragmentSplitter::remainder`]. The first malformed fragment is yielded
/// as an error and iteration stops.
#[derive(Clone, Debug)]
pub struct FragmentSplitter<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> FragmentSplitter<'a> {
    /// Start splitting `payload`.
    #[must_use]
    pub const fn new(payload: &'a [u8]) -> Self {
        Self {
            rest: payload,
            failed: false,
        }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub const fn remainder(&self) -> &'a [u8] { self.rest }
}

impl<'a> Iterator for FragmentSplitter<'a> {
    type Item = Result<Fragment<'a>, FragmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.len() < FragmentHeader::LEN {
            return None;
        }

        let header = match FragmentHeader::parse(self.rest) {
            Ok(header) => header,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };
        let after_header = &self.rest[FragmentHeader::LEN..];
        let declared = header.fragment_length as usize;
        let Some((body, rest)) = after_header.split_at_checked(declared) else {
            self.failed = true;
            return Some(Err(FragmentError::BodyOverrun {
                message_seq: header.message_seq,
                declared,
                available: after_header.len(),
            }));
        };

        self.rest = rest;
        Some(Ok(Fragment { header, body }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.rest.len() / FragmentHeader::LEN))
        }
    }
}

impl FusedIterator for FragmentSplitter<'_> {}
