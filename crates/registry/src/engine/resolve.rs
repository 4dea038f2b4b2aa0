//! Read path: direct lookup, adapter-chain walk with cycle detection, and
//! the discovery fallback for dynamic-only contracts.

use rustc_hash::FxHashSet;

use super::Registry;
use super::tables::Tables;
use crate::contract::Contract;
use crate::error::ResolveError;
use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::provider::ProviderHandle;

/// Outcome of one chain walk over a fixed snapshot.
pub(crate) enum Walk {
	/// A binding was reached, directly or through adapters.
	Found(ProviderHandle),
	/// The chain ended without reaching a binding; the path lists the keys
	/// in walk order.
	NoProvider(Vec<ContractKey>),
	/// The chain revisited a key; the path ends with the repeated key.
	Cycle(Vec<ContractKey>),
}

/// Walks `key` through `tables`: direct binding first, then adapter edges
/// with a visited set seeded with the head. Bounded by the number of
/// distinct keys in the adapter map, so it always terminates.
pub(crate) fn walk(tables: &Tables, namespace: Namespace, key: &ContractKey) -> Walk {
	let space = tables.space(namespace);
	if let Some(binding) = space.bindings.get(key) {
		return Walk::Found(binding.provider.clone());
	}

	let mut visited: FxHashSet<ContractKey> = FxHashSet::default();
	visited.insert(key.clone());
	let mut path = vec![key.clone()];
	let mut current = key;

	loop {
		let Some(target) = space.adapters.get(current) else {
			return Walk::NoProvider(path);
		};
		if let Some(binding) = space.bindings.get(target) {
			return Walk::Found(binding.provider.clone());
		}
		if !visited.insert(target.clone()) {
			path.push(target.clone());
			return Walk::Cycle(path);
		}
		path.push(target.clone());
		current = target;
	}
}

impl Registry {
	/// Resolves `key` in `namespace`, applying the enforcement policy to
	/// failures: lenient degrades to `None` after notifying the sink,
	/// strict panics with the full diagnostic.
	pub fn resolve(&self, namespace: Namespace, key: &ContractKey) -> Option<ProviderHandle> {
		match self.try_resolve(namespace, key) {
			Ok(handle) => Some(handle),
			Err(error) => {
				self.sink.resolve_failed(&error);
				if self.policy.is_strict() {
					panic!("{error}");
				}
				None
			}
		}
	}

	/// Typed form of [`Registry::resolve`].
	pub fn resolve_typed<C: Contract>(&self, namespace: Namespace) -> Option<ProviderHandle> {
		self.resolve(namespace, &C::key())
	}

	/// Resolves without notifying the sink or applying the policy.
	///
	/// Side-effect-free and deterministic for a fixed registry state:
	/// repeated calls return the same handle (or the same error) until a
	/// registration changes the graph.
	pub fn try_resolve(
		&self,
		namespace: Namespace,
		key: &ContractKey,
	) -> Result<ProviderHandle, ResolveError> {
		let tables = self.tables.load_full();
		match walk(&tables, namespace, key) {
			Walk::Found(handle) => Ok(handle),
			Walk::Cycle(chain) => Err(ResolveError::CyclicChain {
				namespace,
				key: key.clone(),
				chain,
			}),
			Walk::NoProvider(_) => {
				// Registry miss. Dynamic keys get one shot at the discovery
				// mechanism before the failure is final.
				if key.is_dynamic()
					&& let Some(handle) = self.discovery.discover(namespace, key)
				{
					return Ok(handle);
				}
				Err(ResolveError::Unresolved {
					namespace,
					key: key.clone(),
					suggestion: nearest_key(&tables, namespace, key),
				})
			}
		}
	}
}

/// Closest registered key in the namespace, within edit distance 3. The
/// queried key is excluded: a dead adapter source is not a suggestion for
/// itself.
fn nearest_key(tables: &Tables, namespace: Namespace, key: &ContractKey) -> Option<String> {
	let space = tables.space(namespace);
	space
		.bindings
		.keys()
		.chain(space.adapters.keys())
		.filter(|k| *k != key)
		.map(|k| k.name().to_string())
		.min_by_key(|k| strsim::levenshtein(key.name(), k))
		.filter(|k| strsim::levenshtein(key.name(), k) <= 3)
}
