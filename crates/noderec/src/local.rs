//! The local node: owner-side management of this node's own record.
//!
//! A [`LocalNode`] holds the private key and the current set of entries.
//! Changing an entry marks the record stale; the next call to
//! [`LocalNode::node`] bumps the sequence number and signs a new record.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use noderec_core::{Entry, Id, Ip4, Ip6, RawEntry, Record, Tcp, Tcp6, TypedEntry, Udp, Udp6};
use noderec_identity::{sign_v4, SecretKey, Secp256k1};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{Node, NodeId};

/// Configuration for a [`LocalNode`].
///
/// ```
/// use noderec::LocalNodeConfig;
///
/// let config = LocalNodeConfig::from_json(r#"{ "ip": "10.0.0.1", "udp": 30303 }"#).unwrap();
/// assert_eq!(config.udp, Some(30303));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalNodeConfig {
    /// Static IPv4 address.
    pub ip: Option<Ipv4Addr>,
    /// Static IPv6 address.
    pub ip6: Option<Ipv6Addr>,
    /// Discovery port.
    pub udp: Option<u16>,
    /// Transport port.
    pub tcp: Option<u16>,
    /// IPv6 discovery port, if different from `udp`.
    pub udp6: Option<u16>,
    /// IPv6 transport port, if different from `tcp`.
    pub tcp6: Option<u16>,
    /// Sequence number the node starts from. Defaults to the current time
    /// in milliseconds so restarts without state still move forward.
    pub initial_seq: Option<u64>,
}

impl LocalNodeConfig {
    /// Parse from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// This node's record, re-signed on demand.
pub struct LocalNode {
    key: SecretKey,
    id: NodeId,
    entries: BTreeMap<String, Bytes>,
    seq: u64,
    current: Option<Node>,
}

impl LocalNode {
    /// Create a local node with entries from `config`.
    pub fn new(key: SecretKey, config: &LocalNodeConfig) -> Self {
        let id = NodeId::from_public_key(&key.public_key());
        let mut node = Self {
            key,
            id,
            entries: BTreeMap::new(),
            seq: config.initial_seq.unwrap_or_else(now_millis),
            current: None,
        };

        if let Some(ip) = config.ip {
            node.set(&Ip4(ip));
        }
        if let Some(ip6) = config.ip6 {
            node.set(&Ip6(ip6));
        }
        if let Some(port) = config.udp {
            node.set(&Udp(port));
        }
        if let Some(port) = config.tcp {
            node.set(&Tcp(port));
        }
        if let Some(port) = config.udp6 {
            node.set(&Udp6(port));
        }
        if let Some(port) = config.tcp6 {
            node.set(&Tcp6(port));
        }
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Sequence number of the last signed record.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Set an entry. Setting the value already present does nothing.
    pub fn set<E: Entry + ?Sized>(&mut self, entry: &E) {
        let key = entry.key();
        if key == Id::KEY || key == Secp256k1::KEY {
            tracing::debug!(key, "ignoring identity entry on local node");
            return;
        }
        let value = Bytes::from(entry.encode());
        if self.entries.get(key) == Some(&value) {
            return;
        }
        self.entries.insert(key.to_owned(), value);
        self.invalidate();
    }

    /// Remove an entry.
    pub fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.invalidate();
        }
    }

    /// Set the static IP address, as "ip" or "ip6" depending on family.
    pub fn set_static_ip(&mut self, ip: IpAddr) {
        match ip {
            IpAddr::V4(ip) => self.set(&Ip4(ip)),
            IpAddr::V6(ip) => self.set(&Ip6(ip)),
        }
    }

    /// The current signed record.
    ///
    /// Signs a new record with the next sequence number if anything changed
    /// since the last call. On error nothing changes and the next call tries
    /// again.
    pub fn node(&mut self) -> Result<Node> {
        if let Some(node) = &self.current {
            return Ok(node.clone());
        }

        let seq = self
            .seq
            .checked_add(1)
            .ok_or_else(|| noderec_core::Error::Invalid("sequence number exhausted".into()))?;
        let mut record = Record::new();
        for (key, value) in &self.entries {
            let entry = RawEntry::new(key.as_str(), value.clone())
                .map_err(noderec_core::Error::from)?;
            record.set(&entry);
        }
        record.set_sequence(seq);
        sign_v4(&mut record, &self.key)?;

        tracing::debug!(id = %self.id, seq, "signed new local record");
        let node = Node::from_signed(record, self.id);
        self.seq = seq;
        self.current = Some(node.clone());
        Ok(node)
    }

    fn invalidate(&mut self) {
        self.current = None;
    }
}

impl fmt::Debug for LocalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalNode")
            .field("id", &self.id)
            .field("seq", &self.seq)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
