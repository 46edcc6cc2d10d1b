//! Golden test vectors for cross-implementation verification.
//!
//! Each vector fixes the inputs of a record and the exact bytes, text form
//! and node ID any implementation must produce for them.

use std::net::Ipv4Addr;

use noderec::{to_text, NodeId};
use noderec_core::{Ip4, Record, Udp};
use noderec_identity::{sign_null, sign_v4, test_registry, SecretKey};
use serde::{Deserialize, Serialize};

/// A golden test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub scheme: String,
    pub secret_key: Option<String>, // v4: 32 bytes hex
    pub null_addr: Option<String>,  // null: 32 bytes hex
    pub seq: u64,
    pub ip: Option<Ipv4Addr>,
    pub udp: Option<u16>,

    // Outputs
    pub record: String, // hex
    pub text: String,
    pub node_id: String, // 32 bytes hex
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "v4-reference".into(),
            description: "secp256k1 record with ip 127.0.0.1 and udp 30303".into(),
            scheme: "v4".into(),
            secret_key: Some(
                "b71c71a67e1177ad4e901695e1b4b9ee17ae16c6668d313eac2f96dbcda3f291".into(),
            ),
            null_addr: None,
            seq: 1,
            ip: Some(Ipv4Addr::new(127, 0, 0, 1)),
            udp: Some(30303),
            record: "f884b8407098ad865b00a582051940cb9cf36836572411a47278783077011599ed5cd16b76f2635f4e234738f30813a89eb9137e3e3df5266e3a1f11df72ecf1145ccb9c01826964827634826970847f00000189736563703235366b31a103ca634cae0d49acb401d8a4c6b6fe8c55b70d115bf400769cc1400f3258cd31388375647082765f".into(),
            text: "enr:-IS4QHCYrYZbAKWCBRlAy5zzaDZXJBGkcnh4MHcBFZntXNFrdvJjX04jRzjzCBOonrkTfj499SZuOh8R33Ls8RRcy5wBgmlkgnY0gmlwhH8AAAGJc2VjcDI1NmsxoQPKY0yuDUmstAHYpMa2_oxVtw0RW_QAdpzBQA8yWM0xOIN1ZHCCdl8".into(),
            node_id: "a448f24c6d18e575453db13171562b71999873db5b286df957af199ec94617f7".into(),
        },
        GoldenVector {
            name: "null-long-list".into(),
            description: "unsigned record whose list header needs the long form".into(),
            scheme: "null".into(),
            secret_key: None,
            null_addr: Some(
                "1111111111111111111111111111111111111111111111111111111111111111".into(),
            ),
            seq: 7,
            ip: Some(Ipv4Addr::new(10, 0, 0, 7)),
            udp: Some(9000),
            record: "f8438007826964846e756c6c826970840a000007886e756c6c61646472a0111111111111111111111111111111111111111111111111111111111111111183756470822328".into(),
            text: "enr:-EOAB4JpZIRudWxsgmlwhAoAAAeIbnVsbGFkZHKgERERERERERERERERERERERERERERERERERERERERERGDdWRwgiMo".into(),
            node_id: "1111111111111111111111111111111111111111111111111111111111111111".into(),
        },
    ]
}

/// Build and sign the record described by a vector's inputs.
pub fn build_record(vector: &GoldenVector) -> Result<Record, String> {
    let mut record = Record::new();
    record.set_sequence(vector.seq);
    if let Some(ip) = vector.ip {
        record.set(&Ip4(ip));
    }
    if let Some(port) = vector.udp {
        record.set(&Udp(port));
    }

    match vector.scheme.as_str() {
        "v4" => {
            let hex = vector.secret_key.as_deref().ok_or("missing secret_key")?;
            let key = SecretKey::from_hex(hex).map_err(|e| e.to_string())?;
            sign_v4(&mut record, &key).map_err(|e| e.to_string())?;
        }
        "null" => {
            let hex = vector.null_addr.as_deref().ok_or("missing null_addr")?;
            let addr = NodeId::from_hex(hex).map_err(|e| e.to_string())?;
            sign_null(&mut record, addr.0).map_err(|e| e.to_string())?;
        }
        other => return Err(format!("unknown scheme {:?}", other)),
    }
    Ok(record)
}

/// Check one vector: signing, decoding, text form and node ID.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let registry = test_registry();
    let record = build_record(vector)?;
    let encoded = record.encode().map_err(|e| e.to_string())?;
    if hex::encode(&encoded) != vector.record {
        return Err(format!("record mismatch: got {}", hex::encode(&encoded)));
    }

    let expected = hex::decode(&vector.record).map_err(|e| e.to_string())?;
    let decoded = Record::decode(&expected, &registry).map_err(|e| e.to_string())?;
    if decoded != record {
        return Err("decoded record differs from signed record".into());
    }

    let text = to_text(&decoded).map_err(|e| e.to_string())?;
    if text != vector.text {
        return Err(format!("text mismatch: got {}", text));
    }

    let node_id = decoded
        .node_address(&registry)
        .map(hex::encode)
        .unwrap_or_default();
    if node_id != vector.node_id {
        return Err(format!("node id mismatch: got {}", node_id));
    }
    Ok(())
}

/// Verify every vector, reporting each name with its outcome.
pub fn verify_all_vectors() -> Vec<(String, Result<(), String>)> {
    all_vectors()
        .iter()
        .map(|v| (v.name.clone(), verify_vector(v)))
        .collect()
}

/// The vectors as pretty-printed JSON, for other implementations.
pub fn vectors_to_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}

/// Parse vectors exported by [`vectors_to_json`].
pub fn vectors_from_json(s: &str) -> serde_json::Result<Vec<GoldenVector>> {
    serde_json::from_str(s)
}
