//! Error taxonomy for registry writes and resolution.

use thiserror::Error;

use crate::key::ContractKey;
use crate::namespace::Namespace;

/// Rejected registry write.
///
/// A rejected write never mutates the store: callers observe the registry
/// exactly as it was before the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
	#[error("registration window is closed: cannot write '{key}'")]
	WindowClosed { key: ContractKey },

	#[error("duplicate registration for '{key}' in {namespace}: already bound to '{existing}'")]
	Duplicate {
		namespace: Namespace,
		key: ContractKey,
		/// Id of the provider already bound.
		existing: String,
	},

	#[error("'{key}' in {namespace} cannot be both a direct registration and an adapter source")]
	AmbiguousAdapter { namespace: Namespace, key: ContractKey },

	#[error("adapter '{key}' in {namespace} already redirects to '{existing}', refusing remap to '{requested}'")]
	AdapterRemapped {
		namespace: Namespace,
		key: ContractKey,
		existing: ContractKey,
		requested: ContractKey,
	},
}

/// Failed resolution, reported to the error sink.
///
/// Under the lenient policy the public surface degrades these to `None`;
/// under the strict policy they abort with the full diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
	/// No direct binding, and no adapter chain reaches one.
	Unresolved {
		namespace: Namespace,
		key: ContractKey,
		/// Closest registered key by edit distance, when one is near.
		suggestion: Option<String>,
	},
	/// The adapter chain revisited a key.
	CyclicChain {
		namespace: Namespace,
		key: ContractKey,
		/// Keys in walk order, ending with the revisited key.
		chain: Vec<ContractKey>,
	},
}

impl ResolveError {
	/// The contract whose resolution failed.
	pub fn key(&self) -> &ContractKey {
		match self {
			Self::Unresolved { key, .. } | Self::CyclicChain { key, .. } => key,
		}
	}

	pub fn namespace(&self) -> Namespace {
		match self {
			Self::Unresolved { namespace, .. } | Self::CyclicChain { namespace, .. } => *namespace,
		}
	}
}

impl std::fmt::Display for ResolveError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unresolved {
				namespace,
				key,
				suggestion,
			} => {
				write!(f, "no provider for contract '{key}' in {namespace}")?;
				if let Some(near) = suggestion {
					write!(f, " (closest registered key: '{near}')")?;
				}
				Ok(())
			}
			Self::CyclicChain {
				namespace,
				key,
				chain,
			} => {
				let walked = chain
					.iter()
					.map(ContractKey::name)
					.collect::<Vec<_>>()
					.join(" -> ");
				write!(
					f,
					"adapter cycle while resolving '{key}' in {namespace}: {walked}"
				)
			}
		}
	}
}

impl std::error::Error for ResolveError {}
