//! Contract registry: compile-time-typed where possible, runtime-resolved
//! always.
//!
//! Modules publish what they need behind named contracts; destinations
//! register what they provide; a resolver connects the two at runtime
//! without either side linking against the other.
//!
//! # Mental Model
//!
//! - A [`ContractKey`] is a normalized contract identity: path
//!   qualification is stripped, so `workspace::editor::EditorViewInput`
//!   and `EditorViewInput` name the same contract.
//! - A [`Registry`] holds four independent namespaces (view/service x
//!   destination/module) of bindings plus adapter edges that redirect
//!   renamed contracts to their successors.
//! - Registration runs during startup while the window is open; sealing
//!   the registry closes it for writing, forever. Resolution is wait-free
//!   and never mutates.
//! - Conformance is proven at compile time through [`Provides`] where the
//!   contract is a declared marker type, and checked at runtime against
//!   [`TypeDescriptor`] capability sets everywhere else.
//! - Faults follow the [`EnforcementPolicy`]: strict builds panic loudly,
//!   lenient builds report to the [`ErrorSink`] and degrade.
//!
//! # Example
//!
//! ```
//! use switchboard_registry::{ContractKey, Namespace, Registry, RouteDef, TypeDescriptor};
//!
//! let registry = Registry::builder("docs").build();
//! let editor = RouteDef::new(
//! 	"editor_view",
//! 	TypeDescriptor::named("EditorView").with_conformance("EditorViewInput"),
//! );
//! registry.register(
//! 	Namespace::ViewDestination,
//! 	ContractKey::new("EditorViewInput"),
//! 	editor,
//! )?;
//! registry.register_adapter(
//! 	Namespace::ViewDestination,
//! 	ContractKey::new("LegacyEditorInput"),
//! 	ContractKey::new("EditorViewInput"),
//! )?;
//! registry.seal();
//!
//! let handle = registry
//! 	.resolve(
//! 		Namespace::ViewDestination,
//! 		&ContractKey::new("workspace::LegacyEditorInput"),
//! 	)
//! 	.unwrap();
//! assert_eq!(handle.id(), "editor_view");
//! # Ok::<(), switchboard_registry::RegisterError>(())
//! ```
//!
//! # Feature flags
//!
//! - `audit` (default): [`declare_contracts!`] announcements and the
//!   [`audit`](mod@audit) completeness pass, backed by `inventory`.

#[cfg(feature = "audit")]
pub mod audit;
mod conformance;
pub mod contract;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod global;
pub mod key;
pub mod namespace;
pub mod policy;
pub mod provider;
pub mod sink;

#[cfg(feature = "audit")]
pub use audit::{AuditFinding, AuditReport, audit};
#[cfg(feature = "audit")]
pub use contract::DeclaredContract;
pub use contract::{Contract, Provides};
pub use descriptor::{TypeDescriptor, TypeShape};
pub use engine::{Registry, RegistryBuilder, RegistrationWindow};
pub use error::{RegisterError, ResolveError};
pub use global::{global, init_global, seal_global};
pub use key::ContractKey;
pub use namespace::{ContractScope, Namespace, ProviderKind};
pub use policy::EnforcementPolicy;
pub use provider::{ProviderDef, ProviderHandle, ProviderSource, RouteDef};
pub use sink::{Discovery, ErrorSink, NoDiscovery, TracingSink};

// Macro support; declaration sites expand to `$crate::inventory` paths.
#[cfg(feature = "audit")]
#[doc(hidden)]
pub use inventory;
