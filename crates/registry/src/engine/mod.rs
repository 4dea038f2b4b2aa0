//! Contract registry engine.
//!
//! # Mental Model
//!
//! A [`Registry`] owns its entire state as one [`Tables`] value behind an
//! `ArcSwap`. Writes run only while the registration window is open: they
//! load the current snapshot, check preconditions against it, clone-and-edit,
//! and publish with a CAS retry loop. Reads load the snapshot wait-free and
//! walk it without locks; once [`Registry::seal`] closes the window the
//! snapshot never changes again.
//!
//! # Invariants
//!
//! - A rejected write leaves the published tables untouched.
//! - Within a namespace a key is a direct binding or an adapter source,
//!   never both.
//! - Adapter-chain walks carry a visited set and always terminate.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::policy::EnforcementPolicy;
use crate::sink::{Discovery, ErrorSink, NoDiscovery, TracingSink};

mod register;
mod resolve;
pub(crate) mod tables;
mod window;


pub use window::RegistrationWindow;

pub(crate) use resolve::{Walk, walk};
use tables::Tables;

/// The owning component: four namespaces of bindings and adapters, the
/// registration window, and the configured collaborators.
///
/// Construct isolated instances through [`Registry::builder`]; the
/// process-wide instance lives in [`crate::global`].
pub struct Registry {
	label: &'static str,
	policy: EnforcementPolicy,
	/// Whether registrations accumulate conformance check records.
	verify: bool,
	window: RegistrationWindow,
	tables: ArcSwap<Tables>,
	sink: Arc<dyn ErrorSink>,
	discovery: Arc<dyn Discovery>,
}

impl Registry {
	/// Starts a builder with build-profile defaults.
	pub fn builder(label: &'static str) -> RegistryBuilder {
		RegistryBuilder::new(label)
	}

	/// Creates a registry with the builder defaults.
	pub fn new(label: &'static str) -> Self {
		RegistryBuilder::new(label).build()
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn policy(&self) -> EnforcementPolicy {
		self.policy
	}

	/// Closes the registration window. Returns true if this call performed
	/// the Open -> Closed transition.
	pub fn seal(&self) -> bool {
		let transitioned = self.window.close();
		if transitioned {
			tracing::info!(registry = self.label, "registration window closed");
		} else {
			tracing::debug!(registry = self.label, "seal on an already-sealed registry");
		}
		transitioned
	}

	pub fn is_sealed(&self) -> bool {
		self.window.is_closed()
	}

	/// True if `key` has a direct binding in `namespace`.
	pub fn is_bound(&self, namespace: Namespace, key: &ContractKey) -> bool {
		self.tables.load().space(namespace).bindings.contains_key(key)
	}

	/// The direct adapter target of `key`, without walking the chain.
	pub fn adapter_target(&self, namespace: Namespace, key: &ContractKey) -> Option<ContractKey> {
		self.tables.load().space(namespace).adapters.get(key).cloned()
	}

	/// Number of direct bindings in `namespace`.
	pub fn binding_count(&self, namespace: Namespace) -> usize {
		self.tables.load().space(namespace).bindings.len()
	}

	pub(crate) fn snapshot(&self) -> Arc<Tables> {
		self.tables.load_full()
	}

	pub(crate) fn verification_enabled(&self) -> bool {
		self.verify
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("label", &self.label)
			.field("policy", &self.policy)
			.field("sealed", &self.is_sealed())
			.finish_non_exhaustive()
	}
}

/// Builder for [`Registry`].
///
/// Defaults follow the build profile: strict enforcement and check
/// recording under `debug_assertions`, lenient and unrecorded otherwise.
pub struct RegistryBuilder {
	label: &'static str,
	policy: EnforcementPolicy,
	verify: bool,
	sink: Arc<dyn ErrorSink>,
	discovery: Arc<dyn Discovery>,
}

impl RegistryBuilder {
	/// Creates a builder with the given label for diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			policy: EnforcementPolicy::for_build(),
			verify: cfg!(debug_assertions),
			sink: Arc::new(TracingSink),
			discovery: Arc::new(NoDiscovery),
		}
	}

	/// Sets how resolution and conformance faults are surfaced.
	pub fn policy(mut self, policy: EnforcementPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Enables or disables conformance check recording.
	pub fn verification(mut self, on: bool) -> Self {
		self.verify = on;
		self
	}

	/// Replaces the error sink.
	pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
		self.sink = sink;
		self
	}

	/// Installs a discovery fallback for dynamic-only contracts.
	pub fn discovery(mut self, discovery: Arc<dyn Discovery>) -> Self {
		self.discovery = discovery;
		self
	}

	pub fn build(self) -> Registry {
		Registry {
			label: self.label,
			policy: self.policy,
			verify: self.verify,
			window: RegistrationWindow::new(),
			tables: ArcSwap::from_pointee(Tables::default()),
			sink: self.sink,
			discovery: self.discovery,
		}
	}
}
