//! Process-wide registry instance.
//!
//! Most callers share one registry for the life of the process: modules
//! register during startup, the host seals it, everything after resolves.
//! Hosts that need a non-default configuration install their own instance
//! with [`init_global`] before anything touches [`global`].

use std::sync::OnceLock;

use crate::engine::Registry;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, created with builder defaults on first
/// access.
pub fn global() -> &'static Registry {
	GLOBAL.get_or_init(|| Registry::builder("global").build())
}

/// Installs a configured registry as the process-wide instance.
///
/// Fails if the instance already exists, handing the rejected registry
/// back to the caller.
pub fn init_global(registry: Registry) -> Result<(), Registry> {
	let result = GLOBAL.set(registry);
	if result.is_err() {
		tracing::error!("global registry already initialized; explicit install rejected");
	}
	result
}

/// Seals the process-wide registry. Returns true on the call that
/// performed the transition.
pub fn seal_global() -> bool {
	global().seal()
}
