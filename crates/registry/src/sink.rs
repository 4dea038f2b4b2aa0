//! Collaborator seams: error notification and discovery fallback.

use crate::error::ResolveError;
use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::provider::ProviderHandle;

/// Receives every failed resolution before the result is degraded.
///
/// Implementations must not call back into the registry.
pub trait ErrorSink: Send + Sync {
	fn resolve_failed(&self, error: &ResolveError);
}

/// Default sink: one structured warn event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
	fn resolve_failed(&self, error: &ResolveError) {
		tracing::warn!(namespace = %error.namespace(), contract = %error.key(), "{error}");
	}
}

/// Fallback lookup for contracts whose identity is only known dynamically.
///
/// Consulted after the direct and adapter paths miss, and only for dynamic
/// keys. A hit is handed to the caller without being recorded in the
/// registry; the tables stay immutable after the window closes.
pub trait Discovery: Send + Sync {
	fn discover(&self, namespace: Namespace, key: &ContractKey) -> Option<ProviderHandle>;
}

/// Default discovery: never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscovery;

impl Discovery for NoDiscovery {
	fn discover(&self, _namespace: Namespace, _key: &ContractKey) -> Option<ProviderHandle> {
		None
	}
}
