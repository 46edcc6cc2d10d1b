//! # Node Record Testkit
//!
//! Testing utilities for node records.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with expected bytes, text and node IDs
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use noderec_testkit::vectors::verify_all_vectors;
//!
//! for (name, outcome) in verify_all_vectors() {
//!     assert!(outcome.is_ok(), "{} failed", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use noderec_testkit::generators::{record_from_params, RecordParams};
//!
//! proptest! {
//!     #[test]
//!     fn signing_is_deterministic(params: RecordParams) {
//!         let r1 = record_from_params(&params);
//!         let r2 = record_from_params(&params);
//!         prop_assert_eq!(r1.encode().unwrap(), r2.encode().unwrap());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{record_from_params, RecordParams};
pub use vectors::{all_vectors, build_record, verify_all_vectors, GoldenVector};
