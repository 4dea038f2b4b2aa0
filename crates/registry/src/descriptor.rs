//! Runtime type descriptors: the capability data conformance checks run on.
//!
//! A [`TypeDescriptor`] records what a concrete destination type *is* (its
//! shape and canonical name) and what it *claims* (declared conformances and
//! an optional parent chain). Descriptors are declared explicitly at
//! registration time; nothing here inspects live values.

use std::sync::Arc;

use crate::key::ContractKey;

/// Structural classification of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
	/// A plain named type.
	Nominal,
	/// A generic instance; conformance is checked at the generic base.
	Generic,
	/// An intersection of named contracts (`A + B`).
	Composed,
	/// A tuple; satisfies nothing but its exact shape.
	Tuple,
	/// A bare function; satisfies nothing but its exact shape.
	Function,
}

/// Capability record for one concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	name: ContractKey,
	/// For generic instances: the name with arguments stripped.
	base: Option<ContractKey>,
	shape: TypeShape,
	conforms: Vec<ContractKey>,
	/// For composed shapes: the intersected contracts.
	members: Vec<ContractKey>,
	parent: Option<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
	/// Builds a descriptor from a name, classifying its shape from the
	/// canonical syntax (`Cache<str>` is generic, `(A,B)` a tuple,
	/// `fn(A)->B` a function, `A+B` composed, anything else nominal).
	pub fn named(name: impl AsRef<str>) -> Self {
		Self::from_key(ContractKey::new(name))
	}

	/// Builds a descriptor for a concrete type.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::from_key(ContractKey::of::<T>())
	}

	/// Builds a composed descriptor from its member contracts.
	pub fn composed(members: impl IntoIterator<Item = ContractKey>) -> Self {
		let members: Vec<ContractKey> = members.into_iter().collect();
		let joined = members
			.iter()
			.map(ContractKey::name)
			.collect::<Vec<_>>()
			.join("+");
		Self {
			name: ContractKey::new(joined),
			base: None,
			shape: TypeShape::Composed,
			conforms: Vec::new(),
			members,
			parent: None,
		}
	}

	fn from_key(name: ContractKey) -> Self {
		let shape = classify(name.name());
		let base = match shape {
			TypeShape::Generic => {
				let n = name.name();
				// classify() only reports Generic when '<' is present
				let cut = n.find('<').unwrap_or(n.len());
				Some(ContractKey::new(&n[..cut]))
			}
			_ => None,
		};
		let members = match shape {
			TypeShape::Composed => name.name().split('+').map(ContractKey::new).collect(),
			_ => Vec::new(),
		};
		Self {
			name,
			base,
			shape,
			conforms: Vec::new(),
			members,
			parent: None,
		}
	}

	/// Adds a declared conformance.
	pub fn with_conformance(mut self, contract: impl Into<ContractKey>) -> Self {
		self.conforms.push(contract.into());
		self
	}

	/// Sets the parent descriptor (supertype analog); the parent's identity
	/// and conformances count toward this type's capability set.
	pub fn with_parent(mut self, parent: TypeDescriptor) -> Self {
		self.parent = Some(Arc::new(parent));
		self
	}

	/// The canonical name key.
	pub fn name(&self) -> &ContractKey {
		&self.name
	}

	/// The key a request for this descriptor targets: the generic base for
	/// generic instances, the name otherwise.
	pub fn base_key(&self) -> &ContractKey {
		self.base.as_ref().unwrap_or(&self.name)
	}

	pub fn shape(&self) -> TypeShape {
		self.shape
	}

	/// Declared conformances, not including inherited or extended ones.
	pub fn conforms(&self) -> &[ContractKey] {
		&self.conforms
	}

	/// Member contracts of a composed shape; empty otherwise.
	pub fn members(&self) -> &[ContractKey] {
		&self.members
	}

	pub fn parent(&self) -> Option<&TypeDescriptor> {
		self.parent.as_deref()
	}
}

impl std::fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name.name())
	}
}

fn classify(canonical: &str) -> TypeShape {
	if canonical.starts_with('(') {
		TypeShape::Tuple
	} else if canonical.starts_with("fn(") {
		TypeShape::Function
	} else if canonical.contains('+') {
		TypeShape::Composed
	} else if canonical.contains('<') {
		TypeShape::Generic
	} else {
		TypeShape::Nominal
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_shape_classification() {
		assert_eq!(TypeDescriptor::named("EditorView").shape(), TypeShape::Nominal);
		assert_eq!(TypeDescriptor::named("Cache<str>").shape(), TypeShape::Generic);
		assert_eq!(TypeDescriptor::named("(A, B)").shape(), TypeShape::Tuple);
		assert_eq!(
			TypeDescriptor::named("fn(Request) -> Response").shape(),
			TypeShape::Function
		);
		assert_eq!(
			TypeDescriptor::named("Observer + Reporter").shape(),
			TypeShape::Composed
		);
	}

	/// Generic instances expose their base for request matching.
	#[test]
	fn test_generic_base_key() {
		let desc = TypeDescriptor::named("app::Cache<std::string::String>");
		assert_eq!(desc.name().name(), "Cache<String>");
		assert_eq!(desc.base_key().name(), "Cache");

		let nominal = TypeDescriptor::named("EditorView");
		assert_eq!(nominal.base_key().name(), "EditorView");
	}

	/// Composed descriptors carry their members, whether built from keys or
	/// classified from syntax.
	#[test]
	fn test_composed_members() {
		let from_keys = TypeDescriptor::composed([
			ContractKey::new("Observer"),
			ContractKey::new("app::Reporter"),
		]);
		assert_eq!(from_keys.members().len(), 2);
		assert_eq!(from_keys.name().name(), "Observer+Reporter");

		let from_syntax = TypeDescriptor::named("dyn a::Observer + b::Reporter");
		assert_eq!(from_syntax.shape(), TypeShape::Composed);
		assert_eq!(
			from_syntax.members(),
			&[ContractKey::new("Observer"), ContractKey::new("Reporter")]
		);
	}

	#[test]
	fn test_parent_chain() {
		let grandparent = TypeDescriptor::named("Base").with_conformance("Rootish");
		let parent = TypeDescriptor::named("Mid").with_parent(grandparent);
		let child = TypeDescriptor::named("Leaf").with_parent(parent);

		let mut names = Vec::new();
		let mut cur = Some(&child);
		while let Some(d) = cur {
			names.push(d.name().name().to_string());
			cur = d.parent();
		}
		assert_eq!(names, vec!["Leaf", "Mid", "Base"]);
	}
}
