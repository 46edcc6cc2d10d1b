//! The "null" identity scheme, for tests.
//!
//! Null records carry an empty signature and store their node address
//! verbatim in the "nulladdr" entry. They prove nothing and must never be
//! accepted from the network.

use noderec_core::{Id, IdentityScheme, Record, Result, SigningScheme};

use crate::entry::NullAddr;

/// Identity scheme that accepts empty signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullScheme;

impl IdentityScheme for NullScheme {
    fn name(&self) -> &'static str {
        Id::NULL
    }

    fn verify(&self, record: &Record) -> Result<bool> {
        Ok(record.signature().map_or(false, <[u8]>::is_empty))
    }

    fn node_address(&self, record: &Record) -> Option<Vec<u8>> {
        record.get::<NullAddr>().ok().map(|addr| addr.0.to_vec())
    }
}

impl SigningScheme for NullScheme {
    /// The node address to record.
    type PrivateKey = [u8; 32];

    fn sign(&self, record: &mut Record, addr: &[u8; 32]) -> Result<()> {
        let mut candidate = record.clone();
        candidate.set(&Id::new(Id::NULL));
        candidate.set(&NullAddr(*addr));
        candidate.set_signature(self, Vec::new())?;
        *record = candidate;
        Ok(())
    }
}

/// Mark `record` as a "null" record with the given node address.
pub fn sign_null(record: &mut Record, addr: [u8; 32]) -> Result<()> {
    NullScheme.sign(record, &addr)
}
