//! # Node Records
//!
//! Signed, versioned and extensible records describing a peer-to-peer node:
//! its identity, addresses and ports.
//!
//! ## Overview
//!
//! - **Record**: sorted key/value pairs with a sequence number, signed by the
//!   node's identity scheme and limited to 300 bytes on the wire
//! - **Node**: a verified record plus its [`NodeId`] and endpoint accessors
//! - **LocalNode**: this node's own record, re-signed whenever it changes
//!
//! ## Usage
//!
//! ```rust
//! use noderec::{default_registry, LocalNode, LocalNodeConfig, Node, SecretKey, Tcp};
//!
//! let config = LocalNodeConfig::from_json(r#"{ "ip": "127.0.0.1", "udp": 30303 }"#).unwrap();
//! let mut local = LocalNode::new(SecretKey::generate(), &config);
//! local.set(&Tcp(30303));
//!
//! let text = local.node().unwrap().to_text().unwrap();
//! let remote = Node::parse(&text, default_registry()).unwrap();
//! assert_eq!(remote.id(), local.id());
//! assert_eq!(remote.tcp(), Some(30303));
//! ```
//!
//! ## Re-exports
//!
//! - `noderec::core` - Record model, codec and scheme registry
//! - `noderec::identity` - The "v4" and "null" identity schemes

pub mod error;
pub mod local;
pub mod node;
pub mod text;

pub use noderec_core as core;
pub use noderec_identity as identity;

pub use error::{NodeError, Result};
pub use local::{LocalNode, LocalNodeConfig};
pub use node::{Node, NodeId};
pub use text::{parse_text, to_text, RecordText, TEXT_PREFIX};

pub use noderec_core::{
    Entry, Id, Ip4, Ip6, RawEntry, Record, SchemeRegistry, Tcp, Tcp6, TypedEntry, Udp, Udp6,
    WithEntry, SIZE_LIMIT,
};
pub use noderec_identity::{
    default_registry, install_default_registry, sign_v4, PublicKey, SecretKey, Secp256k1,
    V4Scheme,
};
