//! Namespace vocabulary for the four independent registries.

/// What kind of provider answers for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
	/// Providers that produce user-facing destinations.
	View,
	/// Providers that produce headless services.
	Service,
}

impl std::fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::View => write!(f, "view"),
			Self::Service => write!(f, "service"),
		}
	}
}

/// Which side of a provider a contract describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractScope {
	/// The destination itself (the thing a provider creates).
	Destination,
	/// The provider's configuration/module surface.
	Module,
}

impl std::fmt::Display for ContractScope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Destination => write!(f, "destination"),
			Self::Module => write!(f, "module"),
		}
	}
}

/// One of the four independent binding tables.
///
/// Bindings and adapter edges never cross namespaces: a contract registered
/// for view destinations is invisible to service resolution and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
	ViewDestination,
	ViewModule,
	ServiceDestination,
	ServiceModule,
}

impl Namespace {
	/// All namespaces, in table order.
	pub const ALL: [Namespace; 4] = [
		Namespace::ViewDestination,
		Namespace::ViewModule,
		Namespace::ServiceDestination,
		Namespace::ServiceModule,
	];

	/// Builds a namespace from its components.
	pub const fn new(kind: ProviderKind, scope: ContractScope) -> Self {
		match (kind, scope) {
			(ProviderKind::View, ContractScope::Destination) => Namespace::ViewDestination,
			(ProviderKind::View, ContractScope::Module) => Namespace::ViewModule,
			(ProviderKind::Service, ContractScope::Destination) => Namespace::ServiceDestination,
			(ProviderKind::Service, ContractScope::Module) => Namespace::ServiceModule,
		}
	}

	/// The provider kind this namespace serves.
	pub const fn kind(self) -> ProviderKind {
		match self {
			Namespace::ViewDestination | Namespace::ViewModule => ProviderKind::View,
			Namespace::ServiceDestination | Namespace::ServiceModule => ProviderKind::Service,
		}
	}

	/// The contract scope this namespace serves.
	pub const fn scope(self) -> ContractScope {
		match self {
			Namespace::ViewDestination | Namespace::ServiceDestination => ContractScope::Destination,
			Namespace::ViewModule | Namespace::ServiceModule => ContractScope::Module,
		}
	}

	/// Stable table index.
	pub(crate) const fn index(self) -> usize {
		match self {
			Namespace::ViewDestination => 0,
			Namespace::ViewModule => 1,
			Namespace::ServiceDestination => 2,
			Namespace::ServiceModule => 3,
		}
	}
}

impl std::fmt::Display for Namespace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.kind(), self.scope())
	}
}
