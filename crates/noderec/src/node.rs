//! Verified node records and node identifiers.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use noderec_core::{Ip4, Ip6, Record, SchemeRegistry, Tcp, Tcp6, Udp, Udp6};
use noderec_identity::{PublicKey, Secp256k1};

use crate::error::{NodeError, Result};
use crate::text;

/// A 32-byte node identifier: the node address derived by the record's
/// identity scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// The ID of the v4 node with this public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self(key.node_address())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for NodeId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for NodeId {
    type Error = NodeError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        slice
            .try_into()
            .map(Self)
            .map_err(|_| NodeError::NodeIdLength(slice.len()))
    }
}

/// A signed record together with its node ID.
///
/// Accessors return `None` for absent or malformed entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    record: Record,
    id: NodeId,
}

impl Node {
    /// Wrap a signed record, deriving its ID with the record's scheme.
    pub fn new(record: Record, registry: &SchemeRegistry) -> Result<Self> {
        if !record.is_signed() {
            return Err(noderec_core::Error::UnsignedRecord.into());
        }
        let address = record.node_address(registry).ok_or_else(|| {
            noderec_core::Error::UnknownScheme(record.identity_scheme().unwrap_or_default())
        })?;
        let id = NodeId::try_from(address.as_slice())?;
        Ok(Self { record, id })
    }

    /// Decode and verify a record, then wrap it.
    pub fn from_bytes(input: &[u8], registry: &SchemeRegistry) -> Result<Self> {
        let record = Record::decode(input, registry)?;
        Self::new(record, registry)
    }

    /// Parse the "enr:" text form.
    pub fn parse(s: &str, registry: &SchemeRegistry) -> Result<Self> {
        let record = text::parse_text(s, registry)?;
        Self::new(record, registry)
    }

    /// A node built from a record known to be signed by `id`'s owner.
    pub(crate) fn from_signed(record: Record, id: NodeId) -> Self {
        Self { record, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn seq(&self) -> u64 {
        self.record.sequence()
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.record.get::<Ip4>().ok().map(|ip| ip.0)
    }

    pub fn ip6(&self) -> Option<Ipv6Addr> {
        self.record.get::<Ip6>().ok().map(|ip| ip.0)
    }

    pub fn udp(&self) -> Option<u16> {
        self.record.get::<Udp>().ok().map(|p| p.0)
    }

    pub fn tcp(&self) -> Option<u16> {
        self.record.get::<Tcp>().ok().map(|p| p.0)
    }

    /// The IPv6 UDP port, falling back to "udp".
    pub fn udp6(&self) -> Option<u16> {
        self.record
            .get::<Udp6>()
            .ok()
            .map(|p| p.0)
            .or_else(|| self.udp())
    }

    /// The IPv6 TCP port, falling back to "tcp".
    pub fn tcp6(&self) -> Option<u16> {
        self.record
            .get::<Tcp6>()
            .ok()
            .map(|p| p.0)
            .or_else(|| self.tcp())
    }

    /// The secp256k1 key of a v4 record.
    pub fn public_key(&self) -> Option<PublicKey> {
        self.record.get::<Secp256k1>().ok().map(|k| k.0)
    }

    /// The "enr:" text form.
    pub fn to_text(&self) -> Result<String> {
        text::to_text(&self.record)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{:?}", self.id),
        }
    }
}
