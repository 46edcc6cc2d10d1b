//! Record: the signed, versioned key/value description of a node.
//!
//! A record holds a sequence number and key/value pairs sorted by key. Once
//! signed it also holds the signature and the exact encoded bytes, which are
//! what gets sent on the wire. Any mutation drops both, so a record is never
//! encoded with a stale signature.
//!
//! Wire format: `rlp([signature, seq, k1, v1, k2, v2, ...])`, at most
//! [`SIZE_LIMIT`] bytes. The signature covers `rlp([seq, k1, v1, ...])`.
//!
//! Records are not synchronized; mutation takes `&mut self`.

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;

use crate::canonical::{
    encode_bytes, encode_list, encode_uint, split, split_raw, split_string, split_uint64, Kind,
};
use crate::entry::{Entry, Id, TypedEntry};
use crate::error::{DecodeError, Error, Result};
use crate::scheme::{IdentityScheme, SchemeRegistry};

/// Maximum encoded size of a signed record, in bytes.
pub const SIZE_LIMIT: usize = 300;

/// A key and its encoded value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    key: String,
    value: Bytes,
}

impl Pair {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The complete RLP item stored under the key.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, hex::encode(&self.value))
    }
}

/// Signature plus the exact bytes it was produced or received with.
#[derive(Clone, PartialEq, Eq, Hash)]
struct Signed {
    signature: Bytes,
    raw: Bytes,
}

/// A node record.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    seq: u64,
    /// Sorted by key, no duplicates.
    pairs: Vec<Pair>,
    signed: Option<Signed>,
}

impl Record {
    /// An empty, unsigned record with sequence number 0.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// The sequence number.
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    /// Overwrite the sequence number. Invalidates the signature.
    pub fn set_sequence(&mut self, seq: u64) {
        self.signed = None;
        self.seq = seq;
    }

    /// Store an entry, replacing any value under the same key.
    ///
    /// Always invalidates the signature, even when the new value is
    /// identical to the old one.
    pub fn set<E: Entry + ?Sized>(&mut self, entry: &E) {
        self.signed = None;
        let value = Bytes::from(entry.encode());
        match self.position(entry.key()) {
            Ok(i) => self.pairs[i].value = value,
            Err(i) => self.pairs.insert(
                i,
                Pair {
                    key: entry.key().to_owned(),
                    value,
                },
            ),
        }
    }

    /// Decode the value stored under `entry`'s key into `entry`.
    ///
    /// Fails with [`Error::NotFound`] if the key is absent and with
    /// [`Error::Entry`] if the stored value does not decode.
    pub fn load<E: Entry + ?Sized>(&self, entry: &mut E) -> Result<()> {
        let raw = self.raw_value(entry.key()).ok_or_else(|| Error::NotFound {
            key: entry.key().to_owned(),
        })?;
        entry.decode(raw).map_err(|source| Error::Entry {
            key: entry.key().to_owned(),
            source,
        })
    }

    /// Read a fixed-key entry.
    pub fn get<E: TypedEntry>(&self) -> Result<E> {
        let raw = self.raw_value(E::KEY).ok_or_else(|| Error::NotFound {
            key: E::KEY.to_owned(),
        })?;
        E::from_raw(raw).map_err(|source| Error::Entry {
            key: E::KEY.to_owned(),
            source,
        })
    }

    /// The encoded value stored under `key`.
    pub fn raw_value(&self, key: &str) -> Option<&[u8]> {
        self.position(key).ok().map(|i| self.pairs[i].value())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_ok()
    }

    /// All pairs, in key order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// The scheme named by the "id" entry, if present and well-formed.
    pub fn identity_scheme(&self) -> Option<String> {
        self.get::<Id>().ok().map(|id| id.0)
    }

    fn position(&self, key: &str) -> std::result::Result<usize, usize> {
        self.pairs.binary_search_by(|p| p.key.as_str().cmp(key))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signature
    // ─────────────────────────────────────────────────────────────────────────

    /// True if the record carries a valid signature for its current content.
    pub fn is_signed(&self) -> bool {
        self.signed.is_some()
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signed.as_ref().map(|s| s.signature.as_ref())
    }

    /// The node address, as derived by the record's identity scheme.
    ///
    /// `None` if the record is unsigned, names no scheme, or names one that
    /// is not in `registry`.
    pub fn node_address(&self, registry: &SchemeRegistry) -> Option<Vec<u8>> {
        if !self.is_signed() {
            return None;
        }
        let name = self.identity_scheme()?;
        registry.get(&name)?.node_address(self)
    }

    /// The bytes covered by the signature: `rlp([seq, k1, v1, ...])`.
    pub fn content_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        self.append_content(&mut payload);
        let mut out = Vec::with_capacity(payload.len() + 3);
        encode_list(&payload, &mut out);
        out
    }

    /// Attach a signature produced by `scheme`.
    ///
    /// The record's "id" entry must name `scheme`, every value must be a
    /// single RLP item, the signature must verify, and the encoded record
    /// must fit in [`SIZE_LIMIT`]. On error nothing changes.
    pub fn set_signature(
        &mut self,
        scheme: &dyn IdentityScheme,
        signature: impl Into<Bytes>,
    ) -> Result<()> {
        match self.identity_scheme() {
            Some(name) if name == scheme.name() => {}
            _ => {
                return Err(Error::Invalid(format!(
                    "\"id\" entry does not name scheme {:?}",
                    scheme.name()
                )))
            }
        }

        for pair in &self.pairs {
            check_single_item(&pair.value).map_err(|source| Error::Entry {
                key: pair.key.clone(),
                source,
            })?;
        }

        let signature = signature.into();
        let raw = self.encode_with(&signature);
        if raw.len() > SIZE_LIMIT {
            return Err(Error::TooBig);
        }

        let previous = self.signed.replace(Signed {
            signature,
            raw: raw.into(),
        });
        match scheme.verify(self) {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.signed = previous;
                Err(Error::InvalidSignature)
            }
            Err(e) => {
                self.signed = previous;
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wire format
    // ─────────────────────────────────────────────────────────────────────────

    /// The encoded record. Fails for records without a current signature.
    pub fn encode(&self) -> Result<Bytes> {
        self.signed
            .as_ref()
            .map(|s| s.raw.clone())
            .ok_or(Error::UnsignedRecord)
    }

    /// Decode and verify a record.
    ///
    /// The input must be exactly one record. The signature is checked with
    /// the scheme from `registry` named by the record's "id" entry. The
    /// decoded record re-encodes to `input` byte for byte.
    pub fn decode(input: &[u8], registry: &SchemeRegistry) -> Result<Self> {
        let result = Self::decode_unchecked(input).and_then(|record| {
            record.verify_with(registry)?;
            Ok(record)
        });
        if let Err(e) = &result {
            tracing::debug!(error = %e, len = input.len(), "rejected node record");
        }
        result
    }

    /// Decode `input` over this record. On error `self` is unchanged.
    pub fn decode_into(&mut self, input: &[u8], registry: &SchemeRegistry) -> Result<()> {
        *self = Self::decode(input, registry)?;
        Ok(())
    }

    fn decode_unchecked(input: &[u8]) -> Result<Self> {
        let (raw, rest) = split_raw(input)?;
        if raw.len() > SIZE_LIMIT {
            return Err(Error::TooBig);
        }
        if !rest.is_empty() {
            return Err(Error::Invalid(format!("{} trailing bytes", rest.len())));
        }
        let payload = match split(raw)? {
            (Kind::List, payload, _) => payload,
            _ => return Err(Error::Invalid("record is not a list".into())),
        };

        let (signature, payload) = split_string(payload).map_err(incomplete)?;
        let (seq, mut payload) = split_uint64(payload).map_err(incomplete)?;

        let mut pairs: Vec<Pair> = Vec::new();
        while !payload.is_empty() {
            let (key, rest) = split_string(payload)?;
            if rest.is_empty() {
                return Err(Error::Invalid("incomplete list".into()));
            }
            let (value, rest) = split_raw(rest)?;
            let key = std::str::from_utf8(key)
                .map_err(|_| Error::Invalid("key is not valid UTF-8".into()))?;

            if let Some(prev) = pairs.last() {
                match prev.key.as_str().cmp(key) {
                    Ordering::Less => {}
                    Ordering::Equal => {
                        return Err(Error::Invalid(format!("duplicate key {:?}", key)))
                    }
                    Ordering::Greater => {
                        return Err(Error::Invalid(format!(
                            "key {:?} out of order after {:?}",
                            key, prev.key
                        )))
                    }
                }
            }

            pairs.push(Pair {
                key: key.to_owned(),
                value: Bytes::copy_from_slice(value),
            });
            payload = rest;
        }

        Ok(Self {
            seq,
            pairs,
            signed: Some(Signed {
                signature: Bytes::copy_from_slice(signature),
                raw: Bytes::copy_from_slice(raw),
            }),
        })
    }

    fn verify_with(&self, registry: &SchemeRegistry) -> Result<()> {
        let name = match self.get::<Id>() {
            Ok(id) => id.0,
            Err(e) if e.is_not_found() => {
                return Err(Error::Invalid("missing \"id\" entry".into()))
            }
            Err(e) => return Err(e),
        };
        let scheme = registry
            .get(&name)
            .ok_or_else(|| Error::UnknownScheme(name.clone()))?;
        if scheme.verify(self)? {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    fn append_content(&self, out: &mut Vec<u8>) {
        encode_uint(self.seq, out);
        for pair in &self.pairs {
            encode_bytes(pair.key.as_bytes(), out);
            out.extend_from_slice(&pair.value);
        }
    }

    fn encode_with(&self, signature: &[u8]) -> Vec<u8> {
        let mut payload = Vec::new();
        encode_bytes(signature, &mut payload);
        self.append_content(&mut payload);
        let mut out = Vec::with_capacity(payload.len() + 3);
        encode_list(&payload, &mut out);
        out
    }
}

/// Running out of list elements before the pairs start.
fn incomplete(e: DecodeError) -> Error {
    match e {
        DecodeError::UnexpectedEnd => Error::Invalid("incomplete list".into()),
        other => other.into(),
    }
}

/// A stored value must be exactly one RLP item, or the record won't decode.
fn check_single_item(value: &[u8]) -> std::result::Result<(), DecodeError> {
    let (_, rest) = split_raw(value)?;
    if rest.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::TrailingBytes(rest.len()))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("seq", &self.seq)
            .field("pairs", &self.pairs)
            .field("signed", &self.is_signed())
            .finish()
    }
}
