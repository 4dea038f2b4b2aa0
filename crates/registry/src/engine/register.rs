//! Write path: precondition checks against the current snapshot, then
//! clone-and-swap publication with CAS retry.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::Registry;
use super::tables::{Binding, CheckRecord, Tables};
use crate::contract::{Contract, Provides};
use crate::error::RegisterError;
use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::provider::ProviderHandle;

impl Registry {
	/// Binds `provider` to `key` in `namespace`, runtime-checked.
	///
	/// Fails if the window is closed, the key is already bound, or the key
	/// is an adapter source in the same namespace. A failed call leaves the
	/// registry unchanged.
	pub fn register(
		&self,
		namespace: Namespace,
		key: ContractKey,
		provider: impl Into<ProviderHandle>,
	) -> Result<(), RegisterError> {
		self.register_at(namespace, key, provider.into(), false)
	}

	/// Binds through the typed surface.
	///
	/// `D: Provides<C>` proves conformance at compile time, so the binding
	/// is marked statically checked: the validator accepts its instances
	/// without a capability walk and no check record is accumulated.
	pub fn register_typed<C, D>(
		&self,
		namespace: Namespace,
		provider: impl Into<ProviderHandle>,
	) -> Result<(), RegisterError>
	where
		C: Contract,
		D: Provides<C>,
	{
		self.register_at(namespace, C::key(), provider.into(), true)
	}

	fn register_at(
		&self,
		namespace: Namespace,
		key: ContractKey,
		provider: ProviderHandle,
		statically_checked: bool,
	) -> Result<(), RegisterError> {
		if self.window.is_closed() {
			return Err(RegisterError::WindowClosed { key });
		}
		loop {
			let old = self.tables.load_full();
			let space = old.space(namespace);

			if let Some(existing) = space.bindings.get(&key) {
				return Err(RegisterError::Duplicate {
					namespace,
					key,
					existing: existing.provider.id().to_string(),
				});
			}
			if space.adapters.contains_key(&key) {
				return Err(RegisterError::AmbiguousAdapter { namespace, key });
			}

			let mut next = Tables::clone(&old);
			if self.verification_enabled() && !statically_checked {
				record_check(&mut next, &provider, &key);
			}
			next.space_mut(namespace).bindings.insert(
				key.clone(),
				Binding {
					provider: provider.clone(),
					statically_checked,
				},
			);

			let prev = self.tables.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				tracing::debug!(
					namespace = %namespace,
					contract = %key,
					provider = provider.id(),
					"contract bound"
				);
				return Ok(());
			}
			// Lost the race; retry against the fresh snapshot.
		}
	}

	/// Declares the adapter edge `adapter -> adaptee` in `namespace`.
	///
	/// Re-declaring an identical edge is a no-op; redirecting an existing
	/// adapter elsewhere is rejected. Cycles are not checked here, because
	/// the full graph is only known once registration ends; the resolver
	/// and the audit detect them.
	pub fn register_adapter(
		&self,
		namespace: Namespace,
		adapter: ContractKey,
		adaptee: ContractKey,
	) -> Result<(), RegisterError> {
		if self.window.is_closed() {
			return Err(RegisterError::WindowClosed { key: adapter });
		}
		loop {
			let old = self.tables.load_full();
			let space = old.space(namespace);

			if space.bindings.contains_key(&adapter) {
				return Err(RegisterError::AmbiguousAdapter {
					namespace,
					key: adapter,
				});
			}
			if let Some(existing) = space.adapters.get(&adapter) {
				if *existing == adaptee {
					return Ok(());
				}
				return Err(RegisterError::AdapterRemapped {
					namespace,
					key: adapter,
					existing: existing.clone(),
					requested: adaptee,
				});
			}

			let mut next = Tables::clone(&old);
			next.space_mut(namespace)
				.adapters
				.insert(adapter.clone(), adaptee.clone());

			let prev = self.tables.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				tracing::debug!(
					namespace = %namespace,
					adapter = %adapter,
					adaptee = %adaptee,
					"adapter declared"
				);
				return Ok(());
			}
		}
	}

	/// Typed form of [`Registry::register_adapter`].
	pub fn register_adapter_typed<A: Contract, B: Contract>(
		&self,
		namespace: Namespace,
	) -> Result<(), RegisterError> {
		self.register_adapter(namespace, A::key(), B::key())
	}

	/// Declares that contract `sub` extends contract `sup`: anything
	/// satisfying `sub` also satisfies `sup`, never the reverse.
	///
	/// Extension edges are registry-wide, not namespaced; they describe
	/// contracts, not bindings.
	pub fn declare_extends(
		&self,
		sub: ContractKey,
		sup: ContractKey,
	) -> Result<(), RegisterError> {
		if self.window.is_closed() {
			return Err(RegisterError::WindowClosed { key: sub });
		}
		loop {
			let old = self.tables.load_full();
			if old
				.extends
				.get(&sub)
				.is_some_and(|supers| supers.contains(&sup))
			{
				return Ok(());
			}

			let mut next = Tables::clone(&old);
			next.extends
				.entry(sub.clone())
				.or_default()
				.push(sup.clone());

			let prev = self.tables.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				return Ok(());
			}
		}
	}
}

fn record_check(tables: &mut Tables, provider: &ProviderHandle, key: &ContractKey) {
	let record = tables
		.checks
		.entry(provider.id().into())
		.or_insert_with(|| CheckRecord {
			destination: provider.destination(),
			contracts: FxHashSet::default(),
		});
	record.contracts.insert(key.clone());
}
