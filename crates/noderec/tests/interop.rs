//! Interoperability tests against records produced by other implementations.
//!
//! Every implementation must decode these inputs to the same values and
//! re-encode them to the same bytes, and must reject the malformed ones.

use std::net::Ipv4Addr;

use noderec::core::Error;
use noderec::{
    default_registry, parse_text, Node, NodeError, Record, RecordText, SecretKey, Udp,
    SIZE_LIMIT,
};

const REFERENCE_HEX: &str = "f884b8407098ad865b00a582051940cb9cf36836572411a47278783077011599ed5cd16b76f2635f4e234738f30813a89eb9137e3e3df5266e3a1f11df72ecf1145ccb9c01826964827634826970847f00000189736563703235366b31a103ca634cae0d49acb401d8a4c6b6fe8c55b70d115bf400769cc1400f3258cd31388375647082765f";
const REFERENCE_TEXT: &str = "enr:-IS4QHCYrYZbAKWCBRlAy5zzaDZXJBGkcnh4MHcBFZntXNFrdvJjX04jRzjzCBOonrkTfj499SZuOh8R33Ls8RRcy5wBgmlkgnY0gmlwhH8AAAGJc2VjcDI1NmsxoQPKY0yuDUmstAHYpMa2_oxVtw0RW_QAdpzBQA8yWM0xOIN1ZHCCdl8";
const REFERENCE_ID: &str = "a448f24c6d18e575453db13171562b71999873db5b286df957af199ec94617f7";
const REFERENCE_KEY: &str = "b71c71a67e1177ad4e901695e1b4b9ee17ae16c6668d313eac2f96dbcda3f291";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_reference_record_decodes() {
    init_tracing();
    let input = hex::decode(REFERENCE_HEX).unwrap();
    let node = Node::from_bytes(&input, default_registry()).unwrap();

    assert_eq!(node.seq(), 1);
    assert_eq!(node.id().to_hex(), REFERENCE_ID);
    assert_eq!(node.ip(), Some(Ipv4Addr::new(127, 0, 0, 1)));
    assert_eq!(node.udp(), Some(30303));
    assert_eq!(node.tcp(), None);
    assert_eq!(
        node.public_key(),
        Some(SecretKey::from_hex(REFERENCE_KEY).unwrap().public_key())
    );
    assert_eq!(node.record().encode().unwrap().as_ref(), input.as_slice());
    assert_eq!(node.to_text().unwrap(), REFERENCE_TEXT);
}

#[test]
fn test_reference_text_decodes() {
    let node = Node::parse(REFERENCE_TEXT, default_registry()).unwrap();
    assert_eq!(node.id().to_hex(), REFERENCE_ID);
    assert_eq!(hex::encode(node.record().encode().unwrap()), REFERENCE_HEX);
}

#[test]
fn test_signing_reproduces_reference() {
    let key = SecretKey::from_hex(REFERENCE_KEY).unwrap();
    let mut record = Record::new();
    record.set(&noderec::Ip4(Ipv4Addr::new(127, 0, 0, 1)));
    record.set(&Udp(30303));
    noderec::sign_v4(&mut record, &key).unwrap();

    assert!(record.is_signed());
    assert_eq!(
        hex::encode(record.node_address(default_registry()).unwrap()),
        REFERENCE_ID
    );

    record.set_sequence(1);
    noderec::sign_v4(&mut record, &key).unwrap();
    assert_eq!(record.to_text().unwrap(), REFERENCE_TEXT);
}

/// Build a record list `[sig, seq, key, value]` with raw, unchecked parts.
fn raw_list(parts: &[&[u8]]) -> Vec<u8> {
    let payload: Vec<u8> = parts.concat();
    let mut out = Vec::new();
    if payload.len() < 56 {
        out.push(0xc0 + payload.len() as u8);
    } else if payload.len() < 256 {
        out.extend_from_slice(&[0xf8, payload.len() as u8]);
    } else {
        out.extend_from_slice(&[0xf9, (payload.len() >> 8) as u8, payload.len() as u8]);
    }
    out.extend_from_slice(&payload);
    out
}

#[test]
fn test_malformed_inputs_rejected() {
    init_tracing();
    let reference = hex::decode(REFERENCE_HEX).unwrap();

    let mut trailing = reference.clone();
    trailing.push(0x00);

    let mut oversized_value = vec![0xb9, 0x01, 0x30];
    oversized_value.extend_from_slice(&[0u8; 0x130]);
    let oversized = raw_list(&[&[0x80], &[0x01], &[0x81, b'k'], &oversized_value]);

    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("empty input", vec![]),
        ("string instead of list", vec![0x83, b'a', b'b', b'c']),
        ("empty list", vec![0xc0]),
        ("signature only", raw_list(&[&[0x80]])),
        ("trailing bytes", trailing),
        ("non-canonical sequence", raw_list(&[&[0x80], &[0x81, 0x01]])),
        ("leading zero sequence", raw_list(&[&[0x80], &[0x82, 0x00, 0x01]])),
        ("long form short list", vec![0xf8, 0x02, 0x80, 0x01]),
        ("key without value", raw_list(&[&[0x80], &[0x01], &[0x82, b'i', b'd']])),
        (
            "duplicate keys",
            raw_list(&[&[0x80], &[0x01], &[0x81, b'a', 0x01], &[0x81, b'a', 0x02]]),
        ),
        (
            "unsorted keys",
            raw_list(&[&[0x80], &[0x01], &[0x81, b'b', 0x01], &[0x81, b'a', 0x02]]),
        ),
        ("missing id", raw_list(&[&[0x80], &[0x01], &[0x81, b'a', 0x01]])),
        ("oversized", oversized),
    ];

    for (name, input) in cases {
        let err = Record::decode(&input, default_registry()).unwrap_err();
        assert_ne!(err, Error::InvalidSignature, "case '{}'", name);
        if name == "oversized" {
            assert_eq!(err, Error::TooBig, "case '{}'", name);
        }
    }
}

#[test]
fn test_size_limit_boundary() {
    let key = SecretKey::generate();

    let mut big = Record::new();
    big.set(&noderec::WithEntry::new("data", vec![0u8; SIZE_LIMIT]));
    let before = big.clone();
    assert_eq!(noderec::sign_v4(&mut big, &key).unwrap_err(), Error::TooBig);
    assert_eq!(big, before);

    let mut small = Record::new();
    small.set(&noderec::WithEntry::new("data", vec![0u8; 100]));
    noderec::sign_v4(&mut small, &key).unwrap();
    assert!(small.encode().unwrap().len() <= SIZE_LIMIT);
}

#[test]
fn test_shrinking_value_allows_signing() {
    let key = SecretKey::generate();
    let mut record = Record::new();

    record.set(&noderec::WithEntry::new("data", vec![0u8; SIZE_LIMIT]));
    let before = record.clone();
    assert_eq!(noderec::sign_v4(&mut record, &key).unwrap_err(), Error::TooBig);
    assert_eq!(record, before);

    record.set(&noderec::WithEntry::new("data", vec![0u8; 100]));
    noderec::sign_v4(&mut record, &key).unwrap();
    assert!(record.is_signed());
    let decoded = Record::decode(&record.encode().unwrap(), default_registry()).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_text_form_errors() {
    assert!(matches!(
        parse_text("-IS4QHCY", default_registry()),
        Err(NodeError::MissingPrefix)
    ));
    assert!(matches!(
        parse_text("enr:*", default_registry()),
        Err(NodeError::Base64(_))
    ));
}
