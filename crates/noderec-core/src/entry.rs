//! Record entries: typed key/value units.
//!
//! Every entry knows the key it is stored under and how to encode and decode
//! its own value. The value bytes kept in a record are the complete RLP item,
//! so entries with list values (or values of unknown types) round-trip
//! unchanged.

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;

use crate::canonical::{split_raw, Decodable, Encodable};
use crate::error::DecodeError;

/// A key/value unit that can be stored in and loaded from a record.
pub trait Entry {
    /// The key this entry is stored under.
    fn key(&self) -> &str;

    /// The canonical RLP encoding of the value.
    fn encode(&self) -> Vec<u8>;

    /// Replace the value with one decoded from `raw`.
    fn decode(&mut self, raw: &[u8]) -> Result<(), DecodeError>;
}

/// An entry whose key is fixed by its type.
///
/// These can be read from a record without a placeholder value, see
/// [`Record::get`](crate::Record::get).
pub trait TypedEntry: Entry + Sized {
    /// The key every value of this type is stored under.
    const KEY: &'static str;

    /// Decode a value from its stored bytes.
    fn from_raw(raw: &[u8]) -> Result<Self, DecodeError>;
}

/// Entries holding a single codec value under a fixed key.
macro_rules! value_entry {
    ($(#[$meta:meta])* $name:ident($inner:ty) = $key:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub $inner);

        impl Entry for $name {
            fn key(&self) -> &str {
                Self::KEY
            }

            fn encode(&self) -> Vec<u8> {
                self.0.to_rlp()
            }

            fn decode(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
                *self = Self::from_raw(raw)?;
                Ok(())
            }
        }

        impl TypedEntry for $name {
            const KEY: &'static str = $key;

            fn from_raw(raw: &[u8]) -> Result<Self, DecodeError> {
                <$inner>::rlp_decode(raw).map(Self)
            }
        }
    };
}

value_entry! {
    /// Name of the identity scheme, e.g. "v4".
    #[derive(Default)]
    Id(String) = "id"
}

value_entry! {
    /// IPv4 address.
    Ip4(Ipv4Addr) = "ip"
}

value_entry! {
    /// IPv6 address.
    Ip6(Ipv6Addr) = "ip6"
}

value_entry! {
    /// UDP port of the discovery protocol.
    #[derive(Copy, Default)]
    Udp(u16) = "udp"
}

value_entry! {
    /// TCP port of the transport protocol.
    #[derive(Copy, Default)]
    Tcp(u16) = "tcp"
}

value_entry! {
    /// IPv6-specific UDP port. Defaults to `udp` when absent.
    #[derive(Copy, Default)]
    Udp6(u16) = "udp6"
}

value_entry! {
    /// IPv6-specific TCP port. Defaults to `tcp` when absent.
    #[derive(Copy, Default)]
    Tcp6(u16) = "tcp6"
}

impl Id {
    /// Identity scheme name of secp256k1 records.
    pub const V4: &'static str = "v4";

    /// Identity scheme name of unsigned test records.
    pub const NULL: &'static str = "null";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Default for Ip4 {
    fn default() -> Self {
        Self(Ipv4Addr::UNSPECIFIED)
    }
}

impl Default for Ip6 {
    fn default() -> Self {
        Self(Ipv6Addr::UNSPECIFIED)
    }
}

/// An entry whose value is already RLP-encoded.
///
/// Used to carry values of unknown types from one record to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawEntry {
    key: String,
    value: Bytes,
}

impl RawEntry {
    /// Create a raw entry. `value` must be exactly one canonical RLP item.
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Result<Self, DecodeError> {
        let value: Bytes = value.into();
        let mut entry = Self {
            key: key.into(),
            value: Bytes::new(),
        };
        entry.decode(&value)?;
        Ok(entry)
    }

    /// The encoded value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl Entry for RawEntry {
    fn key(&self) -> &str {
        &self.key
    }

    fn encode(&self) -> Vec<u8> {
        self.value.to_vec()
    }

    fn decode(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        let (item, rest) = split_raw(raw)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }
        self.value = Bytes::copy_from_slice(item);
        Ok(())
    }
}

/// Stores any codec value under a caller-chosen key.
///
/// ```
/// use noderec_core::{Record, WithEntry};
///
/// let mut record = Record::new();
/// record.set(&WithEntry::new("fork", 7u32));
///
/// let mut fork = WithEntry::new("fork", 0u32);
/// record.load(&mut fork).unwrap();
/// assert_eq!(fork.value, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WithEntry<T> {
    key: String,
    pub value: T,
}

impl<T> WithEntry<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Encodable + Decodable> Entry for WithEntry<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn encode(&self) -> Vec<u8> {
        self.value.to_rlp()
    }

    fn decode(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        self.value = T::rlp_decode(raw)?;
        Ok(())
    }
}
