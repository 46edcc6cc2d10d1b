//! Cryptographic primitives: secp256k1 ECDSA and Keccak-256.
//!
//! Wraps `k256` keys with the fixed-size byte forms used in records.
//! Signatures are deterministic (RFC 6979) and always low-S.

use std::fmt;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use noderec_core::canonical::{decode_string, encode_bytes};
use noderec_core::{DecodeError, Decodable, Encodable, Error, Result};
use sha3::{Digest, Keccak256};

/// Length of a compressed public key.
pub const COMPRESSED_KEY_LEN: usize = 33;

/// Length of an `r || s` signature.
pub const SIGNATURE_LEN: usize = 64;

/// Compute the Keccak-256 hash of data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// A secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse a SEC1-encoded key (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidPublicKey)
    }

    /// The 33-byte compressed form stored in records.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_KEY_LEN] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The 64-byte `x || y` form, without the SEC1 tag byte.
    pub fn to_xy(&self) -> [u8; 64] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; 64];
        out.copy_from_slice(&point.as_bytes()[1..]);
        out
    }

    /// Keccak-256 of the uncompressed key: the "v4" node address.
    pub fn node_address(&self) -> [u8; 32] {
        keccak256(&self.to_xy())
    }

    /// Verify an `r || s` signature over a 32-byte hash.
    ///
    /// Signatures of the wrong length or with a high S value are rejected.
    pub fn verify_prehash(&self, hash: &[u8; 32], signature: &[u8]) -> bool {
        if signature.len() != SIGNATURE_LEN {
            return false;
        }
        let Ok(sig) = Signature::from_slice(signature) else {
            return false;
        };
        if sig.normalize_s().is_some() {
            return false;
        }
        self.0.verify_prehash(hash, &sig).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..16])
    }
}

impl Encodable for PublicKey {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        encode_bytes(&self.to_compressed(), out);
    }
}

impl Decodable for PublicKey {
    fn rlp_decode(item: &[u8]) -> std::result::Result<Self, DecodeError> {
        let bytes = decode_string(item)?;
        if bytes.len() != COMPRESSED_KEY_LEN {
            return Err(DecodeError::InvalidLength {
                expected: COMPRESSED_KEY_LEN,
                got: bytes.len(),
            });
        }
        Self::from_sec1_bytes(bytes)
            .map_err(|_| DecodeError::Custom("invalid secp256k1 public key".into()))
    }
}

/// A secp256k1 private key.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl SecretKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self(SigningKey::random(&mut rng))
    }

    /// Create from 32 big-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SigningKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidPrivateKey)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|_| Error::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    /// The raw secret bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.0.verifying_key())
    }

    /// Sign a 32-byte hash, returning `r || s`.
    pub fn sign_prehash(&self, hash: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN]> {
        let sig = PrehashSigner::<Signature>::sign_prehash(&self.0, hash)
            .map_err(|_| Error::InvalidSignature)?;
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(&sig.to_bytes());
        Ok(out)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({:?})", self.public_key())
    }
}
