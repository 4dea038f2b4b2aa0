//! Registry tables, published as immutable whole-state snapshots.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::TypeDescriptor;
use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::provider::ProviderHandle;

/// One contract binding.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
	pub provider: ProviderHandle,
	/// True when the binding came through the typed surface and its
	/// conformance was proven at compile time.
	pub statically_checked: bool,
}

/// Bindings and adapter edges for one namespace.
#[derive(Debug, Clone, Default)]
pub(crate) struct NamespaceTable {
	pub bindings: FxHashMap<ContractKey, Binding>,
	/// Directed redirection edges, adapter -> adaptee.
	pub adapters: FxHashMap<ContractKey, ContractKey>,
}

/// Verification-mode record of what one provider promised.
#[derive(Debug, Clone)]
pub(crate) struct CheckRecord {
	pub destination: TypeDescriptor,
	pub contracts: FxHashSet<ContractKey>,
}

/// Complete registry state.
///
/// A published snapshot is never mutated; the write path clones the current
/// snapshot, edits the clone, and swaps it in.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
	spaces: [NamespaceTable; 4],
	/// Declared contract extension edges, sub -> supers.
	pub extends: FxHashMap<ContractKey, Vec<ContractKey>>,
	/// Promised contracts per provider id (verification mode only).
	pub checks: FxHashMap<Box<str>, CheckRecord>,
}

impl Tables {
	pub fn space(&self, namespace: Namespace) -> &NamespaceTable {
		&self.spaces[namespace.index()]
	}

	pub fn space_mut(&mut self, namespace: Namespace) -> &mut NamespaceTable {
		&mut self.spaces[namespace.index()]
	}
}
