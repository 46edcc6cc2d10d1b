//! Identity schemes and the registry that maps scheme names to them.
//!
//! A record names its scheme in the "id" entry. Decoding looks the name up
//! in a [`SchemeRegistry`] and lets the scheme verify the signature.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::record::Record;

/// A named algorithm for verifying records and deriving node addresses.
///
/// Schemes are stateless and shared between threads.
pub trait IdentityScheme: Send + Sync {
    /// The name stored in the record's "id" entry.
    fn name(&self) -> &'static str;

    /// Check the record's signature over its content.
    ///
    /// Returns `Ok(false)` for a well-formed but wrong signature and an error
    /// if the record lacks what the scheme needs (e.g. a public key).
    fn verify(&self, record: &Record) -> Result<bool>;

    /// Derive the node address from the record's entries.
    fn node_address(&self, record: &Record) -> Option<Vec<u8>>;
}

/// An identity scheme that can also produce signatures.
pub trait SigningScheme: IdentityScheme {
    /// The secret needed to sign.
    type PrivateKey: ?Sized;

    /// Sign `record`, adding the entries the scheme requires.
    ///
    /// On error the record is left exactly as it was.
    fn sign(&self, record: &mut Record, key: &Self::PrivateKey) -> Result<()>;
}

/// Immutable mapping from scheme name to implementation.
///
/// Built once with [`SchemeRegistry::builder`], then shared for lookups.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    schemes: HashMap<&'static str, Arc<dyn IdentityScheme>>,
}

impl SchemeRegistry {
    /// Start building a registry.
    pub fn builder() -> SchemeRegistryBuilder {
        SchemeRegistryBuilder::default()
    }

    /// A registry with no schemes; every decode fails with `UnknownScheme`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a scheme by name.
    pub fn get(&self, name: &str) -> Option<&dyn IdentityScheme> {
        self.schemes.get(name).map(|s| s.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.schemes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemeRegistry").field(&self.names()).finish()
    }
}

/// Builder for [`SchemeRegistry`].
#[derive(Default)]
pub struct SchemeRegistryBuilder {
    schemes: HashMap<&'static str, Arc<dyn IdentityScheme>>,
}

impl SchemeRegistryBuilder {
    /// Register a scheme under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(mut self, scheme: impl IdentityScheme + 'static) -> Self {
        self.schemes.insert(scheme.name(), Arc::new(scheme));
        self
    }

    /// Register an already shared scheme.
    pub fn register_shared(mut self, scheme: Arc<dyn IdentityScheme>) -> Self {
        self.schemes.insert(scheme.name(), scheme);
        self
    }

    pub fn build(self) -> SchemeRegistry {
        SchemeRegistry {
            schemes: self.schemes,
        }
    }
}
