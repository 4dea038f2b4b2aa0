//! Enforcement policy for resolution and conformance faults.

/// How resolution and conformance faults are surfaced.
///
/// Registration-time errors are unaffected: a rejected write is always an
/// explicit `Err`, under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnforcementPolicy {
	/// Panic with the full diagnostic. A misconfigured registry should not
	/// survive a development run.
	Strict,
	/// Report to the sink, log, and degrade: failed resolution returns
	/// `None`, failed conformance accepts the instance.
	#[default]
	Lenient,
}

impl EnforcementPolicy {
	/// Returns the appropriate policy based on build configuration.
	#[inline]
	pub fn for_build() -> Self {
		if cfg!(debug_assertions) {
			EnforcementPolicy::Strict
		} else {
			EnforcementPolicy::Lenient
		}
	}

	pub(crate) fn is_strict(self) -> bool {
		matches!(self, EnforcementPolicy::Strict)
	}
}
