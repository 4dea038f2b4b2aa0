//! Compile-time contract declarations.
//!
//! Contracts declared as marker types get a typed registration surface:
//! [`Provides`] turns a missing conformance into a compile error, and the
//! runtime validator short-circuits for bindings created that way. Modules
//! can additionally announce the contracts they intend to expose via
//! [`declare_contracts!`]; the completeness audit cross-checks those
//! announcements against a sealed registry.

use crate::key::ContractKey;
#[cfg(feature = "audit")]
use crate::namespace::Namespace;

/// Marker trait for a compile-time contract type.
pub trait Contract: 'static {
	/// Canonical contract name. Path qualification is stripped during key
	/// construction, so a bare and a qualified name are equivalent.
	const NAME: &'static str;

	/// The registry key for this contract.
	fn key() -> ContractKey
	where
		Self: Sized,
	{
		ContractKey::typed::<Self>(Self::NAME)
	}
}

/// Compile-time declaration that a destination type satisfies contract `C`.
///
/// The typed registration surface requires this bound, which makes the
/// binding statically checked: the validator accepts its instances without
/// a runtime capability walk.
pub trait Provides<C: Contract> {}

/// Declares contract marker types.
///
/// ```
/// switchboard_registry::contracts! {
///     /// Input surface of the editor view.
///     EditorViewInput;
///     SettingsViewInput;
/// }
/// ```
#[macro_export]
macro_rules! contracts {
	($( $(#[$meta:meta])* $vis:vis $name:ident; )*) => {
		$(
			$(#[$meta])*
			$vis struct $name;

			impl $crate::contract::Contract for $name {
				const NAME: &'static str = stringify!($name);
			}
		)*
	};
}

/// A contract a module intends to expose, collected for the completeness
/// audit.
#[cfg(feature = "audit")]
pub struct DeclaredContract {
	/// Label of the registry this declaration targets.
	pub registry: &'static str,
	pub namespace: Namespace,
	pub name: &'static str,
	/// Crate that made the declaration.
	pub crate_name: &'static str,
}

#[cfg(feature = "audit")]
inventory::collect!(DeclaredContract);

/// Announces contracts a module will register, for audit cross-checking.
///
/// The first argument is the label of the registry the declarations target
/// (see `Registry::builder`); declarations for other labels are ignored when
/// that registry is audited.
///
/// ```
/// use switchboard_registry::Namespace;
///
/// switchboard_registry::declare_contracts! {
///     "global", Namespace::ViewDestination => "EditorViewInput", "SettingsViewInput"
/// }
/// ```
#[cfg(feature = "audit")]
#[macro_export]
macro_rules! declare_contracts {
	($registry:literal, $ns:expr => $($name:literal),+ $(,)?) => {
		$(
			$crate::inventory::submit! {
				$crate::contract::DeclaredContract {
					registry: $registry,
					namespace: $ns,
					name: $name,
					crate_name: ::core::env!("CARGO_PKG_NAME"),
				}
			}
		)+
	};
}
