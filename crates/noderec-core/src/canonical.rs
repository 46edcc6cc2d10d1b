//! Canonical RLP encoding for node records.
//!
//! Records travel as RLP (recursive length prefix) lists. The encoder always
//! produces the shortest form, and the decoder rejects anything else:
//! - Integers have no leading zero bytes (zero is the empty string)
//! - Single bytes below 0x80 encode as themselves
//! - Long-form length prefixes are used only for payloads of 56 bytes or more
//!   and carry no leading zero bytes
//!
//! Two peers holding the same record therefore always agree on its bytes,
//! which is what the signature covers.

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;

use crate::error::DecodeError;

/// Offset of short byte strings.
const STRING_OFFSET: u8 = 0x80;

/// Offset of short lists.
const LIST_OFFSET: u8 = 0xc0;

/// Payloads shorter than this use a single-byte header.
const SHORT_LIMIT: usize = 56;

/// The kind of an RLP item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A single byte below 0x80, encoded as itself.
    Byte,
    /// A byte string with a length prefix.
    String,
    /// A list of items.
    List,
}

/// A value with a canonical RLP encoding.
pub trait Encodable {
    /// Append the encoding of `self` to `out`.
    fn rlp_append(&self, out: &mut Vec<u8>);

    /// Encode `self` into a fresh buffer.
    fn to_rlp(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.rlp_append(&mut out);
        out
    }
}

/// A value that can be decoded from exactly one canonical RLP item.
pub trait Decodable: Sized {
    /// Decode from `item`, which must contain one item and nothing else.
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Encode a byte string.
pub fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        out.push(bytes[0]);
    } else {
        encode_header(STRING_OFFSET, bytes.len(), out);
        out.extend_from_slice(bytes);
    }
}

/// Encode an unsigned integer as a minimal big-endian byte string.
pub fn encode_uint(n: u64, out: &mut Vec<u8>) {
    let be = n.to_be_bytes();
    let skip = (n.leading_zeros() / 8) as usize;
    encode_bytes(&be[skip..], out);
}

/// Wrap an already-encoded payload in a list header.
pub fn encode_list(payload: &[u8], out: &mut Vec<u8>) {
    encode_header(LIST_OFFSET, payload.len(), out);
    out.extend_from_slice(payload);
}

/// Encode a slice of values as a list.
#[cfg(test)]
pub(crate) fn encode_list_of<T: Encodable>(items: &[T], out: &mut Vec<u8>) {
    let mut payload = Vec::new();
    for item in items {
        item.rlp_append(&mut payload);
    }
    encode_list(&payload, out);
}

fn encode_header(offset: u8, len: usize, out: &mut Vec<u8>) {
    if len < SHORT_LIMIT {
        out.push(offset + len as u8);
    } else {
        let len = len as u64;
        let be = len.to_be_bytes();
        let skip = (len.leading_zeros() / 8) as usize;
        out.push(offset + 55 + (8 - skip) as u8);
        out.extend_from_slice(&be[skip..]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Split the first item off `buf`.
///
/// Returns the item kind, its content (without header) and the remaining
/// bytes after the item.
pub fn split(buf: &[u8]) -> Result<(Kind, &[u8], &[u8]), DecodeError> {
    let (kind, tag, size) = read_header(buf)?;
    let end = tag + size;
    Ok((kind, &buf[tag..end], &buf[end..]))
}

/// Split the first item off `buf` and return its full encoding (header
/// included) plus the remaining bytes.
pub fn split_raw(buf: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    let (_, tag, size) = read_header(buf)?;
    Ok(buf.split_at(tag + size))
}

/// Split off a byte string.
pub fn split_string(buf: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    match split(buf)? {
        (Kind::List, _, _) => Err(DecodeError::ExpectedString),
        (_, content, rest) => Ok((content, rest)),
    }
}

/// Split off a list, returning its payload.
pub fn split_list(buf: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    match split(buf)? {
        (Kind::List, content, rest) => Ok((content, rest)),
        _ => Err(DecodeError::ExpectedList),
    }
}

/// Split off a canonical unsigned integer of at most 64 bits.
pub fn split_uint64(buf: &[u8]) -> Result<(u64, &[u8]), DecodeError> {
    let (content, rest) = split_string(buf)?;
    Ok((uint_from_content(content)?, rest))
}

/// Decode a list payload into values.
#[cfg(test)]
pub(crate) fn decode_list_of<T: Decodable>(item: &[u8]) -> Result<Vec<T>, DecodeError> {
    let (mut payload, rest) = split_list(item)?;
    expect_end(rest)?;
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (raw, rest) = split_raw(payload)?;
        items.push(T::rlp_decode(raw)?);
        payload = rest;
    }
    Ok(items)
}

/// Decode `item` as a single byte string with nothing after it.
pub fn decode_string(item: &[u8]) -> Result<&[u8], DecodeError> {
    let (content, rest) = split_string(item)?;
    expect_end(rest)?;
    Ok(content)
}

fn expect_end(rest: &[u8]) -> Result<(), DecodeError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::TrailingBytes(rest.len()))
    }
}

fn uint_from_content(content: &[u8]) -> Result<u64, DecodeError> {
    match content.len() {
        0 => Ok(0),
        n if n > 8 => Err(DecodeError::UintOverflow(64)),
        _ if content[0] == 0 => Err(DecodeError::CanonInt),
        _ => Ok(content.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))),
    }
}

/// Read an item header: (kind, header size, content size).
fn read_header(buf: &[u8]) -> Result<(Kind, usize, usize), DecodeError> {
    let b = *buf.first().ok_or(DecodeError::UnexpectedEnd)?;
    let (kind, tag, size) = match b {
        0x00..=0x7f => (Kind::Byte, 0, 1),
        0x80..=0xb7 => {
            let size = usize::from(b - STRING_OFFSET);
            // A single byte below 0x80 must be encoded as itself.
            if size == 1 && buf.len() > 1 && buf[1] < STRING_OFFSET {
                return Err(DecodeError::CanonSize);
            }
            (Kind::String, 1, size)
        }
        0xb8..=0xbf => {
            let len_len = usize::from(b - 0xb7);
            (Kind::String, 1 + len_len, read_size(&buf[1..], len_len)?)
        }
        0xc0..=0xf7 => (Kind::List, 1, usize::from(b - LIST_OFFSET)),
        0xf8..=0xff => {
            let len_len = usize::from(b - 0xf7);
            (Kind::List, 1 + len_len, read_size(&buf[1..], len_len)?)
        }
    };
    if size > buf.len() - tag {
        return Err(DecodeError::UnexpectedEnd);
    }
    Ok((kind, tag, size))
}

fn read_size(buf: &[u8], len_len: usize) -> Result<usize, DecodeError> {
    if buf.len() < len_len {
        return Err(DecodeError::UnexpectedEnd);
    }
    if buf[0] == 0 {
        return Err(DecodeError::CanonSize);
    }
    let size = buf[..len_len]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    if size < SHORT_LIMIT as u64 {
        return Err(DecodeError::CanonSize);
    }
    usize::try_from(size).map_err(|_| DecodeError::UnexpectedEnd)
}

// ─────────────────────────────────────────────────────────────────────────────
// Standard impls
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_uint {
    ($($t:ty => $bits:expr),*) => {$(
        impl Encodable for $t {
            fn rlp_append(&self, out: &mut Vec<u8>) {
                encode_uint(u64::from(*self), out);
            }
        }

        impl Decodable for $t {
            fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
                let (n, rest) = split_uint64(item)?;
                expect_end(rest)?;
                <$t>::try_from(n).map_err(|_| DecodeError::UintOverflow($bits))
            }
        }
    )*};
}

impl_uint!(u8 => 8, u16 => 16, u32 => 32, u64 => 64);

impl Encodable for [u8] {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self, out);
    }
}

impl Encodable for Vec<u8> {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self, out);
    }
}

impl Decodable for Vec<u8> {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        decode_string(item).map(<[u8]>::to_vec)
    }
}

impl Encodable for Bytes {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self, out);
    }
}

impl Decodable for Bytes {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        decode_string(item).map(Bytes::copy_from_slice)
    }
}

impl<const N: usize> Encodable for [u8; N] {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self, out);
    }
}

impl<const N: usize> Decodable for [u8; N] {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        let content = decode_string(item)?;
        content.try_into().map_err(|_| DecodeError::InvalidLength {
            expected: N,
            got: content.len(),
        })
    }
}

impl Encodable for str {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self.as_bytes(), out);
    }
}

impl Encodable for String {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(self.as_bytes(), out);
    }
}

impl Decodable for String {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        let content = decode_string(item)?;
        String::from_utf8(content.to_vec())
            .map_err(|_| DecodeError::Custom("string is not valid UTF-8".into()))
    }
}

impl Encodable for Ipv4Addr {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(&self.octets(), out);
    }
}

impl Decodable for Ipv4Addr {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        <[u8; 4]>::rlp_decode(item).map(Ipv4Addr::from)
    }
}

impl Encodable for Ipv6Addr {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(&self.octets(), out);
    }
}

impl Decodable for Ipv6Addr {
    fn rlp_decode(item: &[u8]) -> Result<Self, DecodeError> {
        <[u8; 16]>::rlp_decode(item).map(Ipv6Addr::from)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        (**self).rlp_append(out);
    }
}
