//! Provider handles and definitions.

use std::sync::Arc;

use crate::descriptor::TypeDescriptor;

/// Where a provider definition was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSource {
	/// Built into the host application.
	Builtin,
	/// Declared by a library crate.
	Crate(&'static str),
	/// Constructed at runtime.
	Runtime,
}

impl std::fmt::Display for ProviderSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Builtin => write!(f, "builtin"),
			Self::Crate(name) => write!(f, "crate:{name}"),
			Self::Runtime => write!(f, "runtime"),
		}
	}
}

/// Static provider definition (factory/class analog).
///
/// Const-constructible so definitions can live in statics and be registered
/// by reference during startup.
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderDef {
	pub id: &'static str,
	pub source: ProviderSource,
	/// Canonical name of the destination type this provider creates.
	pub destination: &'static str,
	/// Contracts the destination type declares it satisfies.
	pub destination_conforms: &'static [&'static str],
}

impl ProviderDef {
	/// Creates a definition with all fields specified.
	pub const fn new(
		id: &'static str,
		source: ProviderSource,
		destination: &'static str,
		destination_conforms: &'static [&'static str],
	) -> Self {
		Self {
			id,
			source,
			destination,
			destination_conforms,
		}
	}

	/// Creates a builtin definition with no declared conformances.
	pub const fn minimal(id: &'static str, destination: &'static str) -> Self {
		Self {
			id,
			source: ProviderSource::Builtin,
			destination,
			destination_conforms: &[],
		}
	}

	/// Builds the destination descriptor from the static declaration.
	pub fn descriptor(&self) -> TypeDescriptor {
		self.destination_conforms
			.iter()
			.fold(TypeDescriptor::named(self.destination), |d, c| {
				d.with_conformance(*c)
			})
	}
}

/// Runtime-built declarative provider (lightweight route object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
	pub id: String,
	pub source: ProviderSource,
	pub destination: TypeDescriptor,
}

impl RouteDef {
	/// Creates a runtime route for the given destination.
	pub fn new(id: impl Into<String>, destination: TypeDescriptor) -> Self {
		Self {
			id: id.into(),
			source: ProviderSource::Runtime,
			destination,
		}
	}

	/// Overrides the provenance tag.
	pub fn with_source(mut self, source: ProviderSource) -> Self {
		self.source = source;
		self
	}
}

/// Handle to whatever satisfies a contract.
///
/// Handles compare equal iff they refer to the same underlying definition,
/// so repeated resolution of an unchanged registry yields equal handles.
#[derive(Clone)]
pub enum ProviderHandle {
	Static(&'static ProviderDef),
	Route(Arc<RouteDef>),
}

impl ProviderHandle {
	/// Definition id, for diagnostics and check records.
	pub fn id(&self) -> &str {
		match self {
			Self::Static(def) => def.id,
			Self::Route(route) => &route.id,
		}
	}

	pub fn source(&self) -> ProviderSource {
		match self {
			Self::Static(def) => def.source,
			Self::Route(route) => route.source,
		}
	}

	/// Descriptor of the destination this provider creates.
	pub fn destination(&self) -> TypeDescriptor {
		match self {
			Self::Static(def) => def.descriptor(),
			Self::Route(route) => route.destination.clone(),
		}
	}
}

impl PartialEq for ProviderHandle {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Static(a), Self::Static(b)) => std::ptr::eq(*a, *b),
			(Self::Route(a), Self::Route(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl Eq for ProviderHandle {}

impl std::fmt::Debug for ProviderHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Static(def) => f.debug_tuple("Static").field(&def.id).finish(),
			Self::Route(route) => f.debug_tuple("Route").field(&route.id).finish(),
		}
	}
}

impl From<&'static ProviderDef> for ProviderHandle {
	fn from(def: &'static ProviderDef) -> Self {
		Self::Static(def)
	}
}

impl From<RouteDef> for ProviderHandle {
	fn from(route: RouteDef) -> Self {
		Self::Route(Arc::new(route))
	}
}

impl From<Arc<RouteDef>> for ProviderHandle {
	fn from(route: Arc<RouteDef>) -> Self {
		Self::Route(route)
	}
}
