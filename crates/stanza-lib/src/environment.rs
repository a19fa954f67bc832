//! The target environment's interpreter and platform identity.
//!
//! Passed to the installer explicitly rather than read from ambient process
//! state, so planning stays deterministic under test.

use crate::packages::Version;

#[derive(Debug, Clone)]
pub struct Environment {
	python_version: Version,
	platform: String,
}

impl Environment {
	pub fn new(python_version: Version, platform: impl Into<String>) -> Self {
		Environment { python_version, platform: platform.into() }
	}

	/// The interpreter version as `major.minor.patch`.
	pub fn python_version(&self) -> &Version {
		&self.python_version
	}

	/// The operating system identifier, e.g. `linux` or `darwin`.
	pub fn platform(&self) -> &str {
		&self.platform
	}
}
