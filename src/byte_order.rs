//! Helpers for explicit network byte-order conversions.
//!
//! Record and handshake headers use 16-, 24- and 48-bit big-endian fields.
//! These helpers keep Clippy expectations scoped to the conversion points so
//! header code can remain explicit about wire endianness without repeating
//! lint annotations.

/// Largest value representable in a 24-bit field.
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Largest value representable in a 48-bit field.
pub const U48_MAX: u64 = 0xFFFF_FFFF_FFFF;

/// Serialise a `u16` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::write_network_u16;
///
/// assert_eq!(write_network_u16(0x1234), [0x12, 0x34]);
/// ```
#[must_use]
pub fn write_network_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::read_network_u16;
///
/// assert_eq!(read_network_u16([0x12, 0x34]), 0x1234);
/// ```
#[must_use]
pub fn read_network_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u16::from_be_bytes(bytes)
}

/// Serialise a 24-bit value in network byte order.
///
/// Returns `None` when `value` does not fit in 24 bits.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::write_network_u24;
///
/// assert_eq!(write_network_u24(0x12_3456), Some([0x12, 0x34, 0x56]));
/// assert_eq!(write_network_u24(0x0100_0000), None);
/// ```
#[must_use]
pub fn write_network_u24(value: u32) -> Option<[u8; 3]> {
    if value > U24_MAX {
        return None;
    }
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    let [_, hi, mid, lo] = value.to_be_bytes();
    Some([hi, mid, lo])
}

/// Parse a network-order 24-bit value into a `u32`.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::read_network_u24;
///
/// assert_eq!(read_network_u24([0x12, 0x34, 0x56]), 0x12_3456);
/// ```
#[must_use]
pub fn read_network_u24(bytes: [u8; 3]) -> u32 {
    let [hi, mid, lo] = bytes;
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u32::from_be_bytes([0, hi, mid, lo])
}

/// Serialise a 48-bit value in network byte order.
///
/// Returns `None` when `value` does not fit in 48 bits.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::write_network_u48;
///
/// assert_eq!(
///     write_network_u48(0x1122_3344_5566),
///     Some([0x11, 0x22, 0x33, 0x44, 0x55, 0x66])
/// );
/// ```
#[must_use]
pub fn write_network_u48(value: u64) -> Option<[u8; 6]> {
    if value > U48_MAX {
        return None;
    }
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    let [_, _, b0, b1, b2, b3, b4, b5] = value.to_be_bytes();
    Some([b0, b1, b2, b3, b4, b5])
}

/// Parse a network-order 48-bit value into a `u64`.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::byte_order::read_network_u48;
///
/// assert_eq!(
///     read_network_u48([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]),
///     0x1122_3344_5566
/// );
/// ```
#[must_use]
pub fn read_network_u48(bytes: [u8; 6]) -> u64 {
    let [b0, b1, b2, b3, b4, b5] = bytes;
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u64::from_be_bytes([0, 0, b0, b1, b2, b3, b4, b5])
}
