//! Completeness audit: a lint pass over a sealed registry.
//!
//! Nothing here runs during resolution. The audit walks the current
//! snapshot once, cross-checks it against [`declare_contracts!`]
//! announcements, and returns findings; it never mutates the registry.
//!
//! [`declare_contracts!`]: crate::declare_contracts

use rustc_hash::FxHashSet;

use crate::conformance::key_satisfied;
use crate::contract::DeclaredContract;
use crate::engine::{Registry, Walk, walk};
use crate::key::ContractKey;
use crate::namespace::Namespace;

/// One audit finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditFinding {
	/// A declared contract with neither a direct binding nor an adapter
	/// chain that reaches one.
	MissingRegistration {
		namespace: Namespace,
		contract: ContractKey,
		declared_by: &'static str,
	},
	/// An adapter whose chain ends without reaching a binding.
	DeadAdapter {
		namespace: Namespace,
		source: ContractKey,
		/// The walked chain, in order.
		chain: Vec<ContractKey>,
	},
	/// An adapter cycle, rotated so the smallest key leads.
	AdapterCycle {
		namespace: Namespace,
		cycle: Vec<ContractKey>,
	},
	/// A provider whose recorded destination cannot satisfy a contract it
	/// was registered for.
	ConformanceGap {
		provider: String,
		contract: ContractKey,
	},
}

impl std::fmt::Display for AuditFinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MissingRegistration {
				namespace,
				contract,
				declared_by,
			} => write!(
				f,
				"declared contract '{contract}' in {namespace} has no registration (declared by {declared_by})"
			),
			Self::DeadAdapter {
				namespace,
				source,
				chain,
			} => write!(
				f,
				"adapter '{source}' in {namespace} reaches no provider: {}",
				join(chain)
			),
			Self::AdapterCycle { namespace, cycle } => {
				write!(f, "adapter cycle in {namespace}: {}", join(cycle))
			}
			Self::ConformanceGap { provider, contract } => write!(
				f,
				"provider '{provider}' promises contract '{contract}' its destination does not satisfy"
			),
		}
	}
}

fn join(keys: &[ContractKey]) -> String {
	keys.iter()
		.map(ContractKey::name)
		.collect::<Vec<_>>()
		.join(" -> ")
}

/// Audit result. Findings are logged as they are collected and returned
/// in deterministic order.
#[derive(Debug, Default)]
pub struct AuditReport {
	pub findings: Vec<AuditFinding>,
}

impl AuditReport {
	pub fn is_clean(&self) -> bool {
		self.findings.is_empty()
	}
}

/// Runs every audit pass over the registry's current snapshot.
pub fn audit(registry: &Registry) -> AuditReport {
	if !registry.is_sealed() {
		tracing::warn!(
			registry = registry.label(),
			"auditing a registry whose window is still open"
		);
	}
	let tables = registry.snapshot();
	let mut findings = Vec::new();

	// Declared contracts must resolve, directly or through adapters.
	// Declarations in a cycle surface through the cycle pass instead.
	let mut declared: Vec<&DeclaredContract> = inventory::iter::<DeclaredContract>
		.into_iter()
		.filter(|d| d.registry == registry.label())
		.collect();
	declared.sort_by_key(|d| (d.namespace.index(), d.name));
	for decl in declared {
		let key = ContractKey::new(decl.name);
		if let Walk::NoProvider(_) = walk(&tables, decl.namespace, &key) {
			findings.push(AuditFinding::MissingRegistration {
				namespace: decl.namespace,
				contract: key,
				declared_by: decl.crate_name,
			});
		}
	}

	// Every adapter source gets one walk; dead chains and cycles fall out
	// of the same pass. Cycles are canonicalized so each is reported once
	// no matter how many sources feed it.
	let mut seen_cycles: FxHashSet<(Namespace, Vec<ContractKey>)> = FxHashSet::default();
	for namespace in Namespace::ALL {
		let space = tables.space(namespace);
		let mut sources: Vec<&ContractKey> = space.adapters.keys().collect();
		sources.sort();
		for source in sources {
			match walk(&tables, namespace, source) {
				Walk::Found(_) => {}
				Walk::NoProvider(chain) => findings.push(AuditFinding::DeadAdapter {
					namespace,
					source: source.clone(),
					chain,
				}),
				Walk::Cycle(chain) => {
					let cycle = canonical_cycle(&chain);
					if seen_cycles.insert((namespace, cycle.clone())) {
						findings.push(AuditFinding::AdapterCycle { namespace, cycle });
					}
				}
			}
		}
	}

	// Verification-mode promises must hold against the recorded
	// destination descriptors.
	let mut provider_ids: Vec<&str> = tables.checks.keys().map(AsRef::as_ref).collect();
	provider_ids.sort_unstable();
	for id in provider_ids {
		let record = &tables.checks[id];
		let mut contracts: Vec<&ContractKey> = record.contracts.iter().collect();
		contracts.sort();
		for contract in contracts {
			if !key_satisfied(&record.destination, contract, &tables.extends) {
				findings.push(AuditFinding::ConformanceGap {
					provider: id.to_string(),
					contract: contract.clone(),
				});
			}
		}
	}

	for finding in &findings {
		tracing::warn!(registry = registry.label(), "{finding}");
	}
	AuditReport { findings }
}

/// Extracts the cycle from a walk path ending at the first revisited key
/// and rotates it so the smallest key leads.
fn canonical_cycle(chain: &[ContractKey]) -> Vec<ContractKey> {
	let Some(last) = chain.last() else {
		return Vec::new();
	};
	let start = chain.iter().position(|k| k == last).unwrap_or(0);
	let cycle = &chain[start..chain.len() - 1];
	let min_idx = cycle
		.iter()
		.enumerate()
		.min_by_key(|(_, key)| *key)
		.map(|(i, _)| i)
		.unwrap_or(0);
	let mut rotated = Vec::with_capacity(cycle.len());
	rotated.extend_from_slice(&cycle[min_idx..]);
	rotated.extend_from_slice(&cycle[..min_idx]);
	rotated
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::TypeDescriptor;
	use crate::policy::EnforcementPolicy;
	use crate::provider::RouteDef;

	fn test_registry(label: &'static str) -> Registry {
		Registry::builder(label)
			.policy(EnforcementPolicy::Lenient)
			.verification(true)
			.build()
	}

	fn route(id: &str, destination: &str) -> RouteDef {
		RouteDef::new(id, TypeDescriptor::named(destination))
	}

	crate::declare_contracts! {
		"audit_declared", Namespace::ViewDestination => "BoundInput", "AdaptedInput", "GhostInput"
	}

	/// Declared contracts count as registered when bound directly or
	/// reachable through an adapter; everything else is a finding.
	#[test]
	fn test_missing_declared_contract() {
		let reg = test_registry("audit_declared");
		let dest = TypeDescriptor::named("Bound").with_conformance("BoundInput");
		reg.register(
			Namespace::ViewDestination,
			ContractKey::new("BoundInput"),
			RouteDef::new("bound", dest),
		)
		.unwrap();
		reg.register_adapter(
			Namespace::ViewDestination,
			ContractKey::new("AdaptedInput"),
			ContractKey::new("BoundInput"),
		)
		.unwrap();
		reg.seal();

		let report = audit(&reg);
		let missing: Vec<&AuditFinding> = report
			.findings
			.iter()
			.filter(|f| matches!(f, AuditFinding::MissingRegistration { .. }))
			.collect();
		assert_eq!(missing.len(), 1, "only GhostInput should be missing");
		match missing[0] {
			AuditFinding::MissingRegistration { contract, .. } => {
				assert_eq!(contract.name(), "GhostInput");
			}
			_ => unreachable!(),
		}
	}

	/// A chain that never reaches a binding is reported with its walked
	/// path.
	#[test]
	fn test_dead_adapter_reports_chain() {
		let reg = test_registry("audit_dead");
		reg.register_adapter(
			Namespace::ServiceDestination,
			ContractKey::new("Old"),
			ContractKey::new("Gone"),
		)
		.unwrap();
		reg.seal();

		let report = audit(&reg);
		assert_eq!(report.findings.len(), 1);
		match &report.findings[0] {
			AuditFinding::DeadAdapter {
				namespace,
				source,
				chain,
			} => {
				assert_eq!(*namespace, Namespace::ServiceDestination);
				assert_eq!(source.name(), "Old");
				assert_eq!(chain, &[ContractKey::new("Old"), ContractKey::new("Gone")]);
			}
			other => panic!("expected DeadAdapter, got {other:?}"),
		}
	}

	/// A cycle is one finding, however many sources feed it.
	#[test]
	fn test_cycle_reported_once() {
		let reg = test_registry("audit_cycle");
		reg.register_adapter(
			Namespace::ViewModule,
			ContractKey::new("X"),
			ContractKey::new("Y"),
		)
		.unwrap();
		reg.register_adapter(
			Namespace::ViewModule,
			ContractKey::new("Y"),
			ContractKey::new("X"),
		)
		.unwrap();
		// A tail feeding into the cycle must not produce a second report.
		reg.register_adapter(
			Namespace::ViewModule,
			ContractKey::new("W"),
			ContractKey::new("X"),
		)
		.unwrap();
		reg.seal();

		let report = audit(&reg);
		let cycles: Vec<&AuditFinding> = report
			.findings
			.iter()
			.filter(|f| matches!(f, AuditFinding::AdapterCycle { .. }))
			.collect();
		assert_eq!(cycles.len(), 1);
		match cycles[0] {
			AuditFinding::AdapterCycle { cycle, .. } => {
				assert_eq!(cycle, &[ContractKey::new("X"), ContractKey::new("Y")]);
			}
			_ => unreachable!(),
		}
	}

	/// Verification records catch providers registered for contracts their
	/// destination never declares.
	#[test]
	fn test_conformance_gap() {
		let reg = test_registry("audit_gap");
		let honest = TypeDescriptor::named("Clock").with_conformance("TimeService");
		reg.register(
			Namespace::ServiceDestination,
			ContractKey::new("TimeService"),
			RouteDef::new("clock", honest),
		)
		.unwrap();
		// "calendar" promises CalendarService but declares nothing.
		reg.register(
			Namespace::ServiceDestination,
			ContractKey::new("CalendarService"),
			route("calendar", "Calendar"),
		)
		.unwrap();
		reg.seal();

		let report = audit(&reg);
		assert_eq!(report.findings.len(), 1);
		match &report.findings[0] {
			AuditFinding::ConformanceGap { provider, contract } => {
				assert_eq!(provider, "calendar");
				assert_eq!(contract.name(), "CalendarService");
			}
			other => panic!("expected ConformanceGap, got {other:?}"),
		}
	}

	/// A clean, sealed registry audits clean.
	#[test]
	fn test_clean_registry() {
		let reg = test_registry("audit_clean");
		let dest = TypeDescriptor::named("Editor").with_conformance("EditorInput");
		reg.register(
			Namespace::ViewDestination,
			ContractKey::new("EditorInput"),
			RouteDef::new("editor", dest),
		)
		.unwrap();
		reg.register_adapter(
			Namespace::ViewDestination,
			ContractKey::new("LegacyEditorInput"),
			ContractKey::new("EditorInput"),
		)
		.unwrap();
		reg.seal();

		assert!(audit(&reg).is_clean());
	}
}
