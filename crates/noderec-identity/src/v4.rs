//! The "v4" identity scheme: secp256k1 signatures over Keccak-256.
//!
//! A v4 record carries the signer's compressed public key in the
//! "secp256k1" entry. The signature is the 64-byte `r || s` ECDSA signature
//! over `keccak256(content)`, and the node address is the Keccak-256 hash of
//! the uncompressed public key.

use noderec_core::{Error, Id, IdentityScheme, Record, Result, SigningScheme};

use crate::crypto::{keccak256, SecretKey};
use crate::entry::Secp256k1;

/// The secp256k1 identity scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V4Scheme;

impl IdentityScheme for V4Scheme {
    fn name(&self) -> &'static str {
        Id::V4
    }

    fn verify(&self, record: &Record) -> Result<bool> {
        let signature = record.signature().ok_or(Error::UnsignedRecord)?;
        let Secp256k1(public) = record.get::<Secp256k1>()?;
        let hash = keccak256(&record.content_bytes());
        Ok(public.verify_prehash(&hash, signature))
    }

    fn node_address(&self, record: &Record) -> Option<Vec<u8>> {
        let Secp256k1(public) = record.get::<Secp256k1>().ok()?;
        Some(public.node_address().to_vec())
    }
}

impl SigningScheme for V4Scheme {
    type PrivateKey = SecretKey;

    /// Sets "id" to "v4" and "secp256k1" to the signer's key, then signs.
    ///
    /// Works on a copy so a failure (e.g. [`Error::TooBig`]) leaves the
    /// record untouched.
    fn sign(&self, record: &mut Record, key: &SecretKey) -> Result<()> {
        let mut candidate = record.clone();
        candidate.set(&Id::new(Id::V4));
        candidate.set(&Secp256k1(key.public_key()));

        let hash = keccak256(&candidate.content_bytes());
        let signature = key.sign_prehash(&hash)?;
        candidate.set_signature(self, signature.to_vec())?;

        tracing::trace!(seq = candidate.sequence(), "signed v4 record");
        *record = candidate;
        Ok(())
    }
}

/// Sign `record` with the v4 scheme.
pub fn sign_v4(record: &mut Record, key: &SecretKey) -> Result<()> {
    V4Scheme.sign(record, key)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use noderec_core::{DecodeError, Entry, Ip4, SchemeRegistry, Tcp, Udp, WithEntry, SIZE_LIMIT};
    use proptest::prelude::*;

    use super::*;

    const KEY_HEX: &str = "b71c71a67e1177ad4e901695e1b4b9ee17ae16c6668d313eac2f96dbcda3f291";
    const RECORD_HEX: &str = "f884b8407098ad865b00a582051940cb9cf36836572411a47278783077011599ed5cd16b76f2635f4e234738f30813a89eb9137e3e3df5266e3a1f11df72ecf1145ccb9c01826964827634826970847f00000189736563703235366b31a103ca634cae0d49acb401d8a4c6b6fe8c55b70d115bf400769cc1400f3258cd31388375647082765f";
    const NODE_ID_HEX: &str = "a448f24c6d18e575453db13171562b71999873db5b286df957af199ec94617f7";

    fn registry() -> SchemeRegistry {
        SchemeRegistry::builder().register(V4Scheme).build()
    }

    fn key() -> SecretKey {
        SecretKey::from_hex(KEY_HEX).unwrap()
    }

    fn reference_record() -> Record {
        let mut record = Record::new();
        record.set_sequence(1);
        record.set(&Ip4(Ipv4Addr::new(127, 0, 0, 1)));
        record.set(&Udp(30303));
        record
    }

    #[test]
    fn test_decode_reference_record() {
        let input = hex::decode(RECORD_HEX).unwrap();
        let record = Record::decode(&input, &registry()).unwrap();

        assert_eq!(record.sequence(), 1);
        assert_eq!(record.identity_scheme().as_deref(), Some("v4"));
        assert_eq!(record.get::<Ip4>().unwrap(), Ip4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(record.get::<Udp>().unwrap(), Udp(30303));
        assert_eq!(record.get::<Secp256k1>().unwrap(), Secp256k1(key().public_key()));
        assert_eq!(
            hex::encode(record.node_address(&registry()).unwrap()),
            NODE_ID_HEX
        );
        assert_eq!(record.encode().unwrap().as_ref(), input.as_slice());
    }

    #[test]
    fn test_sign_reproduces_reference_record() {
        let mut record = reference_record();
        sign_v4(&mut record, &key()).unwrap();

        assert_eq!(hex::encode(record.encode().unwrap()), RECORD_HEX);
    }

    #[test]
    fn test_sign_then_decode() {
        let key = SecretKey::generate();
        let mut record = reference_record();
        record.set(&Tcp(30303));
        sign_v4(&mut record, &key).unwrap();

        let decoded = Record::decode(&record.encode().unwrap(), &registry()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(
            decoded.node_address(&registry()).unwrap(),
            key.public_key().node_address().to_vec()
        );
    }

    #[test]
    fn test_tampered_record_rejected() {
        let mut input = hex::decode(RECORD_HEX).unwrap();
        // Flip the last byte of the udp port.
        let last = input.len() - 1;
        input[last] ^= 0x01;

        assert_eq!(
            Record::decode(&input, &registry()).unwrap_err(),
            Error::InvalidSignature
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let mut record = reference_record();
        sign_v4(&mut record, &key()).unwrap();
        let signature = record.signature().unwrap().to_vec();

        // Same content, different key: the old signature no longer verifies.
        record.set(&Secp256k1(SecretKey::generate().public_key()));
        assert_eq!(
            record.set_signature(&V4Scheme, signature).unwrap_err(),
            Error::InvalidSignature
        );
        assert!(!record.is_signed());
    }

    #[test]
    fn test_verify_requires_public_key() {
        let mut record = Record::new();
        record.set(&Id::new(Id::V4));
        let err = record.set_signature(&V4Scheme, vec![0u8; 64]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_sign_too_big_leaves_record_unchanged() {
        let mut record = reference_record();
        record.set(&WithEntry::new("data", vec![0xaau8; SIZE_LIMIT]));
        let before = record.clone();

        assert_eq!(sign_v4(&mut record, &key()).unwrap_err(), Error::TooBig);
        assert_eq!(record, before);
        assert!(record.identity_scheme().is_none());
        assert!(!record.is_signed());
    }

    #[test]
    fn test_sign_moderate_value() {
        let mut record = reference_record();
        record.set(&WithEntry::new("data", vec![0xaau8; 100]));
        sign_v4(&mut record, &key()).unwrap();

        let encoded = record.encode().unwrap();
        assert!(encoded.len() <= SIZE_LIMIT);
        assert_eq!(Record::decode(&encoded, &registry()).unwrap(), record);
    }

    #[test]
    fn test_shrinking_value_allows_signing() {
        let mut record = reference_record();
        record.set(&WithEntry::new("data", vec![0xaau8; SIZE_LIMIT]));
        let before = record.clone();
        assert_eq!(sign_v4(&mut record, &key()).unwrap_err(), Error::TooBig);
        assert_eq!(record, before);

        record.set(&WithEntry::new("data", vec![0xaau8; 100]));
        sign_v4(&mut record, &key()).unwrap();
        assert!(record.is_signed());
        assert!(record.encode().unwrap().len() <= SIZE_LIMIT);
    }

    /// Writes two RLP items as its value.
    struct Concatenated;

    impl Entry for Concatenated {
        fn key(&self) -> &str {
            "bogus"
        }

        fn encode(&self) -> Vec<u8> {
            vec![0x01, 0x02]
        }

        fn decode(&mut self, _raw: &[u8]) -> std::result::Result<(), DecodeError> {
            Ok(())
        }
    }

    #[test]
    fn test_sign_rejects_value_that_is_not_one_item() {
        let mut record = reference_record();
        record.set(&Concatenated);
        let before = record.clone();

        assert_eq!(
            sign_v4(&mut record, &key()).unwrap_err(),
            Error::Entry {
                key: "bogus".into(),
                source: DecodeError::TrailingBytes(1),
            }
        );
        assert_eq!(record, before);
        assert!(!record.is_signed());
    }

    #[test]
    fn test_mutation_invalidates_signature() {
        let mut record = reference_record();
        sign_v4(&mut record, &key()).unwrap();
        assert!(record.is_signed());

        record.set(&Udp(30304));
        assert!(!record.is_signed());
        assert_eq!(record.encode().unwrap_err(), Error::UnsignedRecord);
        assert!(record.node_address(&registry()).is_none());
    }

    #[test]
    fn test_unregistered_scheme_rejected() {
        let input = hex::decode(RECORD_HEX).unwrap();
        assert_eq!(
            Record::decode(&input, &SchemeRegistry::empty()).unwrap_err(),
            Error::UnknownScheme("v4".into())
        );
    }

    fn secret_keys() -> impl Strategy<Value = SecretKey> {
        any::<[u8; 32]>().prop_filter_map("not a valid scalar", |bytes| {
            SecretKey::from_bytes(&bytes).ok()
        })
    }

    proptest! {
        #[test]
        fn prop_signed_records_decode_to_signer(
            key in secret_keys(),
            seq in any::<u64>(),
            udp in any::<u16>(),
            ip in any::<[u8; 4]>(),
        ) {
            let mut record = Record::new();
            record.set_sequence(seq);
            record.set(&Ip4(Ipv4Addr::from(ip)));
            record.set(&Udp(udp));
            sign_v4(&mut record, &key).unwrap();

            let encoded = record.encode().unwrap();
            let decoded = Record::decode(&encoded, &registry()).unwrap();
            prop_assert_eq!(decoded.sequence(), seq);
            prop_assert_eq!(decoded.get::<Udp>().unwrap(), Udp(udp));
            prop_assert_eq!(decoded.get::<Secp256k1>().unwrap(), Secp256k1(key.public_key()));
            prop_assert_eq!(
                decoded.node_address(&registry()).unwrap(),
                key.public_key().node_address().to_vec()
            );
            prop_assert_eq!(decoded.encode().unwrap(), encoded);
        }
    }
}
