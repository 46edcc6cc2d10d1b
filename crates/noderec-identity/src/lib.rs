//! # Node Record Identity
//!
//! Identity schemes for [`noderec_core::Record`].
//!
//! - [`V4Scheme`] - secp256k1 ECDSA over Keccak-256, the network standard
//! - [`NullScheme`] - unsigned records with a fixed address, for tests
//!
//! ## Example
//!
//! ```
//! use noderec_core::{Record, Udp};
//! use noderec_identity::{default_registry, sign_v4, SecretKey};
//!
//! let key = SecretKey::generate();
//! let mut record = Record::new();
//! record.set(&Udp(30303));
//! sign_v4(&mut record, &key).unwrap();
//!
//! let decoded = Record::decode(&record.encode().unwrap(), default_registry()).unwrap();
//! assert_eq!(decoded.get::<Udp>().unwrap(), Udp(30303));
//! ```

pub mod crypto;
pub mod entry;
pub mod null;
pub mod registry;
pub mod v4;

pub use crypto::{keccak256, PublicKey, SecretKey};
pub use entry::{NullAddr, Secp256k1};
pub use null::{sign_null, NullScheme};
pub use registry::{default_registry, install_default_registry, standard_registry, test_registry};
pub use v4::{sign_v4, V4Scheme};
