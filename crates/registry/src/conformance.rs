//! Conformance checking: capability-set membership over the declared
//! satisfies relation.
//!
//! [`Registry::satisfies`] answers the pure question "does this instance
//! descriptor satisfy that requested contract"; [`Registry::validate`]
//! wraps the same walk in the enforcement policy and the verification-mode
//! check records, and is what the instantiation layer calls right after
//! constructing a destination.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::{TypeDescriptor, TypeShape};
use crate::engine::Registry;
use crate::key::ContractKey;
use crate::namespace::Namespace;
use crate::provider::ProviderHandle;

pub(crate) type ExtendsMap = FxHashMap<ContractKey, Vec<ContractKey>>;

/// Everything `instance` can stand in for: its own identity (generic
/// instances collapse to their base), declared conformances, composed
/// members, the same for every ancestor, all expanded through declared
/// contract extension edges.
fn capability_closure(instance: &TypeDescriptor, extends: &ExtendsMap) -> FxHashSet<ContractKey> {
	let mut set: FxHashSet<ContractKey> = FxHashSet::default();
	let mut cursor = Some(instance);
	while let Some(desc) = cursor {
		set.insert(desc.base_key().clone());
		set.extend(desc.conforms().iter().cloned());
		set.extend(desc.members().iter().cloned());
		cursor = desc.parent();
	}

	let mut queue: Vec<ContractKey> = set.iter().cloned().collect();
	while let Some(key) = queue.pop() {
		if let Some(supers) = extends.get(&key) {
			for sup in supers {
				if set.insert(sup.clone()) {
					queue.push(sup.clone());
				}
			}
		}
	}
	set
}

/// Does `instance` satisfy the named contract `contract`?
///
/// Tuple and function shapes satisfy nothing but their exact name; every
/// other shape answers through the capability closure, which only ever
/// expands upward (sub to super), so an instance satisfying only a
/// super-contract never satisfies a sub-contract request.
pub(crate) fn key_satisfied(
	instance: &TypeDescriptor,
	contract: &ContractKey,
	extends: &ExtendsMap,
) -> bool {
	match instance.shape() {
		TypeShape::Tuple | TypeShape::Function => instance.name() == contract,
		_ => capability_closure(instance, extends).contains(contract),
	}
}

/// Does `instance` satisfy the requested descriptor?
pub(crate) fn satisfies_in(
	instance: &TypeDescriptor,
	requested: &TypeDescriptor,
	extends: &ExtendsMap,
) -> bool {
	match requested.shape() {
		TypeShape::Composed => requested
			.members()
			.iter()
			.all(|member| key_satisfied(instance, member, extends)),
		TypeShape::Tuple | TypeShape::Function => {
			instance.shape() == requested.shape() && instance.name() == requested.name()
		}
		TypeShape::Nominal | TypeShape::Generic => {
			key_satisfied(instance, requested.base_key(), extends)
		}
	}
}

impl Registry {
	/// Pure satisfies test against this registry's declared extension
	/// edges. No policy is applied and nothing is logged.
	pub fn satisfies(&self, instance: &TypeDescriptor, requested: &TypeDescriptor) -> bool {
		satisfies_in(instance, requested, &self.snapshot().extends)
	}

	/// Validates a freshly constructed `instance` against the `requested`
	/// contract, returning whether the instance may be handed out.
	///
	/// Bindings made through the typed surface were proven by the compiler
	/// and pass without a walk. Otherwise the instance must satisfy the
	/// requested contract and, in verification mode, every contract its
	/// provider promised. A mismatch panics under the strict policy; the
	/// lenient policy logs it and accepts the instance anyway.
	///
	/// Note that a contract resolved through an adapter is still validated
	/// as itself: the instance descriptor has to declare the adapter
	/// contract for the walk to pass.
	pub fn validate(
		&self,
		namespace: Namespace,
		instance: &TypeDescriptor,
		requested: &TypeDescriptor,
		provider: &ProviderHandle,
	) -> bool {
		let tables = self.snapshot();

		let requested_key = requested.base_key();
		if tables
			.space(namespace)
			.bindings
			.get(requested_key)
			.is_some_and(|b| b.statically_checked)
		{
			return true;
		}

		let mut ok = satisfies_in(instance, requested, &tables.extends);
		if ok && let Some(record) = tables.checks.get(provider.id()) {
			ok = record
				.contracts
				.iter()
				.all(|contract| key_satisfied(instance, contract, &tables.extends));
		}

		if !ok {
			tracing::error!(
				namespace = %namespace,
				contract = %requested.name(),
				provider = provider.id(),
				destination = %instance.name(),
				"conformance mismatch"
			);
			if self.policy().is_strict() {
				panic!(
					"destination '{}' from provider '{}' does not satisfy contract '{}' in {namespace}",
					instance.name(),
					provider.id(),
					requested.name()
				);
			}
			// Lenient: accept and continue.
			return true;
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::policy::EnforcementPolicy;
	use crate::provider::RouteDef;

	fn lenient() -> Registry {
		Registry::builder("conformance_test")
			.policy(EnforcementPolicy::Lenient)
			.verification(true)
			.build()
	}

	/// Exact identity always satisfies.
	#[test]
	fn test_exact_type_satisfies_itself() {
		let reg = lenient();
		let desc = TypeDescriptor::named("EditorView");
		assert!(reg.satisfies(&desc, &TypeDescriptor::named("EditorView")));
		assert!(!reg.satisfies(&desc, &TypeDescriptor::named("SettingsView")));
	}

	/// A subtype satisfies its ancestors' identities and conformances;
	/// an ancestor never satisfies a subtype request.
	#[test]
	fn test_parent_chain_direction() {
		let reg = lenient();
		let base = TypeDescriptor::named("BaseView").with_conformance("Renderable");
		let leaf = TypeDescriptor::named("LeafView").with_parent(base.clone());

		assert!(reg.satisfies(&leaf, &TypeDescriptor::named("BaseView")));
		assert!(reg.satisfies(&leaf, &TypeDescriptor::named("Renderable")));
		assert!(!reg.satisfies(&base, &TypeDescriptor::named("LeafView")));
	}

	/// Declared contract extension expands upward only: an instance
	/// satisfying `Sub` validates against `Super`, but an instance
	/// satisfying only `Super` does not validate against `Sub`.
	#[test]
	fn test_extension_direction() {
		let reg = lenient();
		reg.declare_extends(ContractKey::new("SubInput"), ContractKey::new("SuperInput"))
			.unwrap();

		let sub_conformer = TypeDescriptor::named("A").with_conformance("SubInput");
		let super_conformer = TypeDescriptor::named("B").with_conformance("SuperInput");

		assert!(reg.satisfies(&sub_conformer, &TypeDescriptor::named("SuperInput")));
		assert!(!reg.satisfies(&super_conformer, &TypeDescriptor::named("SubInput")));
	}

	/// Extension edges chain transitively.
	#[test]
	fn test_extension_is_transitive() {
		let reg = lenient();
		reg.declare_extends(ContractKey::new("C"), ContractKey::new("B"))
			.unwrap();
		reg.declare_extends(ContractKey::new("B"), ContractKey::new("A"))
			.unwrap();

		let c = TypeDescriptor::named("Impl").with_conformance("C");
		assert!(reg.satisfies(&c, &TypeDescriptor::named("A")));
	}

	/// A composed request is satisfied only when every member is.
	#[test]
	fn test_composed_requires_every_member() {
		let reg = lenient();
		let both = TypeDescriptor::named("Both")
			.with_conformance("Observer")
			.with_conformance("Reporter");
		let one = TypeDescriptor::named("One").with_conformance("Observer");

		let request = TypeDescriptor::composed([
			ContractKey::new("Observer"),
			ContractKey::new("Reporter"),
		]);
		assert!(reg.satisfies(&both, &request));
		assert!(!reg.satisfies(&one, &request));
	}

	/// A composed instance stands in for each of its members.
	#[test]
	fn test_composed_instance_satisfies_members() {
		let reg = lenient();
		let composed = TypeDescriptor::named("Observer + Reporter");
		assert!(reg.satisfies(&composed, &TypeDescriptor::named("Observer")));
		assert!(reg.satisfies(&composed, &TypeDescriptor::named("Reporter")));
		assert!(!reg.satisfies(&composed, &TypeDescriptor::named("Editor")));
	}

	/// Generic conformance is checked at the generic base: any instance of
	/// the base satisfies any request for the base, regardless of
	/// arguments on either side.
	#[test]
	fn test_generic_checked_at_base() {
		let reg = lenient();
		let instance = TypeDescriptor::named("Cache<String>").with_conformance("Store");
		assert!(reg.satisfies(&instance, &TypeDescriptor::named("Cache<str>")));
		assert!(reg.satisfies(&instance, &TypeDescriptor::named("Cache")));
		assert!(reg.satisfies(&instance, &TypeDescriptor::named("Store")));
		assert!(!reg.satisfies(&instance, &TypeDescriptor::named("Registry<str>")));
	}

	/// Tuples and functions satisfy only their exact shape, never a named
	/// contract, and a named type never satisfies a tuple request.
	#[test]
	fn test_tuple_and_function_exact_shape_only() {
		let reg = lenient();
		let pair = TypeDescriptor::named("(A, B)");
		assert!(reg.satisfies(&pair, &TypeDescriptor::named("(A,B)")));
		assert!(!reg.satisfies(&pair, &TypeDescriptor::named("(A, C)")));
		assert!(!reg.satisfies(&pair, &TypeDescriptor::named("Observer")));

		let fun = TypeDescriptor::named("fn(Request) -> Response");
		assert!(reg.satisfies(&fun, &TypeDescriptor::named("fn(Request)->Response")));
		assert!(!reg.satisfies(&fun, &TypeDescriptor::named("Handler")));

		let nominal = TypeDescriptor::named("Observer");
		assert!(!reg.satisfies(&nominal, &TypeDescriptor::named("(A, B)")));
	}

	/// Typed bindings short-circuit validation; the compiler already
	/// proved them.
	#[test]
	fn test_validate_short_circuits_static_bindings() {
		crate::contracts! {
			FeedInput;
		}
		struct Feed;
		impl crate::contract::Provides<FeedInput> for Feed {}

		let reg = lenient();
		let provider =
			ProviderHandle::from(RouteDef::new("feed", TypeDescriptor::named("Feed")));
		reg.register_typed::<FeedInput, Feed>(Namespace::ServiceDestination, provider.clone())
			.unwrap();

		// The instance descriptor claims nothing, yet validation passes.
		let bare = TypeDescriptor::named("Feed");
		assert!(reg.validate(
			Namespace::ServiceDestination,
			&bare,
			&TypeDescriptor::named("FeedInput"),
			&provider,
		));
	}

	/// Verification mode also holds the instance to every contract its
	/// provider promised, not only the one being requested.
	#[test]
	fn test_validate_consults_check_records() {
		let reg = lenient();
		let destination = TypeDescriptor::named("Feed").with_conformance("FeedInput");
		let provider = ProviderHandle::from(RouteDef::new("feed", destination.clone()));
		reg.register(
			Namespace::ServiceDestination,
			ContractKey::new("FeedInput"),
			provider.clone(),
		)
		.unwrap();
		reg.register(
			Namespace::ServiceDestination,
			ContractKey::new("FeedAdmin"),
			provider.clone(),
		)
		.unwrap();

		// Instance satisfies the requested contract but not the second
		// promise; lenient policy accepts and logs.
		let instance = TypeDescriptor::named("Feed").with_conformance("FeedInput");
		assert!(reg.validate(
			Namespace::ServiceDestination,
			&instance,
			&TypeDescriptor::named("FeedInput"),
			&provider,
		));

		// The pure walk still reports the truth.
		assert!(!reg.satisfies(&instance, &TypeDescriptor::named("FeedAdmin")));
	}

	/// Strict policy turns a mismatch into a hard failure naming the
	/// provider.
	#[test]
	#[should_panic(expected = "does not satisfy contract")]
	fn test_validate_strict_panics_on_mismatch() {
		let reg = Registry::builder("conformance_strict")
			.policy(EnforcementPolicy::Strict)
			.verification(false)
			.build();
		let provider =
			ProviderHandle::from(RouteDef::new("feed", TypeDescriptor::named("Feed")));
		reg.register(
			Namespace::ServiceDestination,
			ContractKey::new("FeedInput"),
			provider.clone(),
		)
		.unwrap();

		let instance = TypeDescriptor::named("Feed");
		reg.validate(
			Namespace::ServiceDestination,
			&instance,
			&TypeDescriptor::named("FeedInput"),
			&provider,
		);
	}
}
