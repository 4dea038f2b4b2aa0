//! Registration window guard.

use std::sync::atomic::{AtomicBool, Ordering};

/// Open -> Closed, exactly once, never back.
///
/// Every write checks this guard and refuses to run once closed; reads
/// never consult it.
#[derive(Debug)]
pub struct RegistrationWindow {
	closed: AtomicBool,
}

impl RegistrationWindow {
	/// Creates an open window.
	pub fn new() -> Self {
		Self {
			closed: AtomicBool::new(false),
		}
	}

	/// Closes the window. Returns true if this call performed the
	/// transition, false if it was already closed.
	pub fn close(&self) -> bool {
		!self.closed.swap(true, Ordering::AcqRel)
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}
}

impl Default for RegistrationWindow {
	fn default() -> Self {
		Self::new()
	}
}
