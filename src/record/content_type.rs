//! Closed classification of record content types.

use std::fmt;

/// Content carried by a record.
///
/// Only [`ContentType::Handshake`] is consumed by the reassembly engine; every
/// other variant is handed back to the caller's dispatcher untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Change cipher spec notification (20).
    ChangeCipherSpec,
    /// Alert (21).
    Alert,
    /// Handshake fragments (22).
    Handshake,
    /// Protected application data (23).
    ApplicationData,
    /// Any tag this crate does not name.
    Unknown(u8),
}

impl ContentType {
    /// Report whether records of this type carry handshake fragments.
    #[must_use]
    pub const fn is_handshake(self) -> bool { matches!(self, Self::Handshake) }

    /// Return the on-wire tag.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::ChangeCipherSpec => 20,
            Self::Alert => 21,
            Self::Handshake => 22,
            Self::ApplicationData => 23,
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<u8> for ContentType {
    fn from(tag: u8) -> Self {
        match tag {
            20 => Self::ChangeCipherSpec,
            21 => Self::Alert,
            22 => Self::Handshake,
            23 => Self::ApplicationData,
            other => Self::Unknown(other),
        }
    }
}

impl From<ContentType> for u8 {
    fn from(value: ContentType) -> Self { value.to_u8() }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChangeCipherSpec => f.write_str("change_cipher_spec"),
            Self::Alert => f.write_str("alert"),
            Self::Handshake => f.write_str("handshake"),
            Self::ApplicationData => f.write_str("application_data"),
            Self::Unknown(tag) => write!(f, "unknown({tag})"),
        }
    }
}
