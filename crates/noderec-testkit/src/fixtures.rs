//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use noderec::{LocalNode, LocalNodeConfig, NodeId};
use noderec_core::{Record, SchemeRegistry, Tcp, Udp};
use noderec_identity::{sign_v4, test_registry, SecretKey};

/// A signing key with a registry that also accepts "null" records.
pub struct TestFixture {
    pub key: SecretKey,
    pub registry: SchemeRegistry,
}

impl TestFixture {
    /// Create a new test fixture with a random key.
    pub fn new() -> Self {
        Self {
            key: SecretKey::generate(),
            registry: test_registry(),
        }
    }

    /// Create with a key made of `seed` repeated. Seeds that do not form a
    /// valid scalar (0 and 255) fall back to a random key.
    pub fn with_seed(seed: u8) -> Self {
        let key = SecretKey::from_bytes(&[seed; 32])
            .unwrap_or_else(|_| SecretKey::generate());
        Self {
            key,
            registry: test_registry(),
        }
    }

    pub fn id(&self) -> NodeId {
        NodeId::from_public_key(&self.key.public_key())
    }

    /// A signed record with the given sequence number and ports.
    pub fn make_record(&self, seq: u64, udp: u16, tcp: u16) -> Record {
        let mut record = Record::new();
        record.set_sequence(seq);
        record.set(&Udp(udp));
        record.set(&Tcp(tcp));
        sign_v4(&mut record, &self.key).expect("small record signs");
        record
    }

    /// A local node for this fixture's key, starting at sequence 0.
    pub fn make_local_node(&self, config: LocalNodeConfig) -> LocalNode {
        let config = LocalNodeConfig {
            initial_seq: config.initial_seq.or(Some(0)),
            ..config
        };
        LocalNode::new(self.key.clone(), &config)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures with distinct deterministic keys.
pub fn multi_party_fixtures(count: u8) -> Vec<TestFixture> {
    (1..=count).map(TestFixture::with_seed).collect()
}
