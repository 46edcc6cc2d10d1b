//! Entries owned by the identity schemes.

use noderec_core::{DecodeError, Decodable, Encodable, Entry, TypedEntry};

use crate::crypto::PublicKey;

/// Compressed secp256k1 public key of a "v4" record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1(pub PublicKey);

impl Entry for Secp256k1 {
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

impl TypedEntry for Secp256k1 {
    const KEY: &'static str = "secp256k1";

    fn from_raw(raw: &[u8]) -> Result<Self, DecodeError> {
        PublicKey::rlp_decode(raw).map(Self)
    }
}

/// The node address of a "null" record, stored verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullAddr(pub [u8; 32]);

impl Entry for NullAddr {
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

impl TypedEntry for NullAddr {
    const KEY: &'static str = "nulladdr";

    fn from_raw(raw: &[u8]) -> Result<Self, DecodeError> {
        <[u8; 32]>::rlp_decode(raw).map(Self)
    }
}
