//! # Node Record Core
//!
//! Signed node records: the data model, canonical encoding and signature
//! lifecycle shared by every identity scheme.
//!
//! This crate contains no I/O and no cryptography. Identity schemes plug in
//! through the [`IdentityScheme`] trait; see `noderec-identity` for the
//! secp256k1 "v4" scheme.
//!
//! ## Key Types
//!
//! - [`Record`] - Sorted key/value pairs, a sequence number and a signature
//! - [`Entry`] - A typed key/value unit stored in a record
//! - [`IdentityScheme`] - Pluggable signature verification and node addressing
//! - [`SchemeRegistry`] - Name to scheme mapping used when decoding
//!
//! ## Encoding
//!
//! Records are RLP lists, at most [`SIZE_LIMIT`] bytes. See [`canonical`].

pub mod canonical;
pub mod entry;
pub mod error;
pub mod record;
pub mod scheme;

pub use canonical::{Decodable, Encodable};
pub use entry::{Entry, Id, Ip4, Ip6, RawEntry, Tcp, Tcp6, TypedEntry, Udp, Udp6, WithEntry};
pub use error::{DecodeError, Error, Result};
pub use record::{Pair, Record, SIZE_LIMIT};
pub use scheme::{IdentityScheme, SchemeRegistry, SchemeRegistryBuilder, SigningScheme};
