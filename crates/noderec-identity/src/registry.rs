//! The process-wide default scheme registry.
//!
//! The default registry is initialized on first use and never changes
//! afterwards. Callers that need other schemes either install a registry
//! before first use or pass their own [`SchemeRegistry`] explicitly.

use std::sync::OnceLock;

use noderec_core::SchemeRegistry;

use crate::null::NullScheme;
use crate::v4::V4Scheme;

static DEFAULT_REGISTRY: OnceLock<SchemeRegistry> = OnceLock::new();

/// The registry of schemes valid on the network: only "v4".
pub fn standard_registry() -> SchemeRegistry {
    SchemeRegistry::builder().register(V4Scheme).build()
}

/// Standard schemes plus "null", for tests.
pub fn test_registry() -> SchemeRegistry {
    SchemeRegistry::builder()
        .register(V4Scheme)
        .register(NullScheme)
        .build()
}

/// The shared default registry, [`standard_registry`] unless another one
/// was installed first.
pub fn default_registry() -> &'static SchemeRegistry {
    DEFAULT_REGISTRY.get_or_init(standard_registry)
}

/// Install `registry` as the default.
///
/// Only possible before the default is first used; otherwise the registry
/// is handed back.
pub fn install_default_registry(registry: SchemeRegistry) -> Result<(), SchemeRegistry> {
    DEFAULT_REGISTRY.set(registry).map_err(|registry| {
        tracing::warn!("default scheme registry already initialized");
        registry
    })
}
