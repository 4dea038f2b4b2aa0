//! Contract key normalization and identity.
//!
//! A [`ContractKey`] is the lookup identity for a contract. Path
//! qualification is stripped on construction so the same logical contract
//! resolves identically no matter which module named it: `app::EditorView`,
//! `other::app::EditorView` and `EditorView` all produce the key
//! `EditorView`. Stripping applies inside generic arguments, tuples and
//! function signatures as well.

use std::any::TypeId;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Normalized, hashable identity for a contract.
///
/// Equality and hashing use the normalized name only; the optional
/// [`TypeId`] rides along for keys built from a concrete type and marks the
/// key as statically known (see [`ContractKey::is_dynamic`]).
#[derive(Clone)]
pub struct ContractKey {
	name: Arc<str>,
	type_id: Option<TypeId>,
}

impl ContractKey {
	/// Builds a dynamic key from a raw name.
	///
	/// Dynamic keys carry no type identity and are eligible for the
	/// discovery fallback during resolution.
	pub fn new(raw: impl AsRef<str>) -> Self {
		Self {
			name: normalize(raw.as_ref()).into(),
			type_id: None,
		}
	}

	/// Builds a statically-known key with an explicit name.
	pub fn typed<T: ?Sized + 'static>(name: &str) -> Self {
		Self {
			name: normalize(name).into(),
			type_id: Some(TypeId::of::<T>()),
		}
	}

	/// Builds a statically-known key named after the type itself.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::typed::<T>(std::any::type_name::<T>())
	}

	/// The normalized name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// True for keys built without type identity (runtime-constructed).
	pub fn is_dynamic(&self) -> bool {
		self.type_id.is_none()
	}

	/// The type identity, when statically known.
	pub fn type_id(&self) -> Option<TypeId> {
		self.type_id
	}
}

impl PartialEq for ContractKey {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for ContractKey {}

impl Hash for ContractKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl PartialOrd for ContractKey {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ContractKey {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.name.cmp(&other.name)
	}
}

impl std::fmt::Debug for ContractKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContractKey")
			.field("name", &self.name)
			.field("typed", &self.type_id.is_some())
			.finish()
	}
}

impl std::fmt::Display for ContractKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.name)
	}
}

impl From<&str> for ContractKey {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}

/// Strips path qualification from every segment of `raw`, drops `dyn`
/// markers and removes whitespace, yielding the canonical key form.
fn normalize(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	// Start of the current path segment within `out`. A `::` rewinds the
	// output to this point, discarding the qualifying segment.
	let mut seg_start = 0usize;
	let mut chars = raw.chars().peekable();
	while let Some(c) = chars.next() {
		match c {
			':' if chars.peek() == Some(&':') => {
				chars.next();
				out.truncate(seg_start);
			}
			'<' | '>' | ',' | '(' | ')' | '&' | '+' | '[' | ']' | ';' | ' ' => {
				out.push(c);
				seg_start = out.len();
			}
			_ => out.push(c),
		}
	}
	if out.contains("dyn ") {
		out = out.replace("dyn ", "");
	}
	out.retain(|c| c != ' ');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rustc_hash::FxHashMap;

	trait Marker {}

	/// Path qualification is stripped from plain names.
	#[test]
	fn test_strips_module_prefix() {
		assert_eq!(ContractKey::new("EditorView").name(), "EditorView");
		assert_eq!(ContractKey::new("app::EditorView").name(), "EditorView");
		assert_eq!(
			ContractKey::new("vendor::app::views::EditorView").name(),
			"EditorView"
		);
	}

	/// Qualification inside generic arguments, tuples and function types is
	/// stripped per segment, and whitespace is canonicalized away.
	#[test]
	fn test_strips_nested_qualification() {
		assert_eq!(
			ContractKey::new("collections::Pair<alpha::A, beta::B>").name(),
			"Pair<A,B>"
		);
		assert_eq!(
			ContractKey::new("(std::string::String, u32)").name(),
			"(String,u32)"
		);
		assert_eq!(
			ContractKey::new("fn(app::Request) -> app::Response").name(),
			"fn(Request)->Response"
		);
	}

	/// `dyn` markers do not participate in identity.
	#[test]
	fn test_dyn_marker_is_dropped() {
		assert_eq!(ContractKey::new("dyn app::Observer").name(), "Observer");
		assert_eq!(
			ContractKey::new("dyn app::Observer + app::Reporter").name(),
			"Observer+Reporter"
		);
		assert_eq!(
			ContractKey::of::<dyn Marker>(),
			ContractKey::new("Marker")
		);
	}

	/// Keys are equal iff their normalized names are equal; type identity is
	/// ignored for equality and hashing.
	#[test]
	fn test_equality_ignores_type_identity() {
		struct EditorView;
		let dynamic = ContractKey::new("EditorView");
		let typed = ContractKey::typed::<EditorView>("util::EditorView");
		assert_eq!(dynamic, typed);
		assert!(dynamic.is_dynamic());
		assert!(!typed.is_dynamic());

		let mut map: FxHashMap<ContractKey, u32> = FxHashMap::default();
		map.insert(typed, 7);
		assert_eq!(map.get(&dynamic), Some(&7));
	}

	/// Type-derived names normalize the same way as raw strings.
	#[test]
	fn test_of_uses_normalized_type_name() {
		assert_eq!(ContractKey::of::<Vec<String>>().name(), "Vec<String>");
		assert_eq!(ContractKey::of::<(String, u32)>().name(), "(String,u32)");
	}
}
