//! Proptest generators for property-based testing.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use proptest::prelude::*;

use noderec_core::{Ip4, Record, Udp, WithEntry};
use noderec_identity::{sign_v4, SecretKey};

/// Generate a valid secp256k1 secret key.
pub fn secret_key() -> impl Strategy<Value = SecretKey> {
    any::<[u8; 32]>().prop_filter_map("not a valid scalar", |bytes| {
        SecretKey::from_bytes(&bytes).ok()
    })
}

/// Generate an entry key that never collides with a well-known one.
pub fn entry_key() -> impl Strategy<Value = String> {
    "[a-z]{1,3}[0-9]{1,4}".prop_map(String::from)
}

/// Generate value bytes of at most `max_len`.
pub fn entry_value(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a sequence number.
pub fn seq() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Parameters for generating a v4 record that fits the size limit.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub key: SecretKey,
    pub seq: u64,
    pub ip: Option<Ipv4Addr>,
    pub udp: Option<u16>,
    pub entries: BTreeMap<String, Vec<u8>>,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            secret_key(),
            seq(),
            any::<Option<[u8; 4]>>(),
            any::<Option<u16>>(),
            prop::collection::btree_map(entry_key(), entry_value(24), 0..4),
        )
            .prop_map(|(key, seq, ip, udp, entries)| RecordParams {
                key,
                seq,
                ip: ip.map(Ipv4Addr::from),
                udp,
                entries,
            })
            .boxed()
    }
}

/// Build the unsigned record described by `params`.
pub fn unsigned_record_from_params(params: &RecordParams) -> Record {
    let mut record = Record::new();
    record.set_sequence(params.seq);
    if let Some(ip) = params.ip {
        record.set(&Ip4(ip));
    }
    if let Some(port) = params.udp {
        record.set(&Udp(port));
    }
    for (key, value) in &params.entries {
        record.set(&WithEntry::new(key.as_str(), value.clone()));
    }
    record
}

/// Build and sign the record described by `params`.
///
/// # Panics
///
/// Panics if signing fails, which the size bounds of [`RecordParams`] rule
/// out.
pub fn record_from_params(params: &RecordParams) -> Record {
    let mut record = unsigned_record_from_params(params);
    sign_v4(&mut record, &params.key).expect("generated record fits the size limit");
    record
}
