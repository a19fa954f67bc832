use serde::{Serialize, Deserialize};

use super::constraint::{PlatformConstraint, VersionConstraint};
use super::version::Version;

/// A requirement on another package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
	pub name: String,
	pub constraint: VersionConstraint,
	/// True when the dependency is only reachable through an extra.
	pub optional: bool,
	/// Extra groups this dependency further activates.
	pub extras: Vec<String>,
	pub python_versions: VersionConstraint,
	pub platform: PlatformConstraint,
}

impl Dependency {
	pub fn new(name: impl Into<String>, constraint: &str) -> crate::Result<Self> {
		Ok(Dependency {
			name: name.into(),
			constraint: VersionConstraint::parse(constraint)?,
			optional: false,
			extras: Vec::new(),
			python_versions: VersionConstraint::any(),
			platform: PlatformConstraint::any(),
		})
	}

	/// A dependency matching any version of `name`.
	pub fn any(name: impl Into<String>) -> Self {
		Dependency {
			name: name.into(),
			constraint: VersionConstraint::any(),
			optional: false,
			extras: Vec::new(),
			python_versions: VersionConstraint::any(),
			platform: PlatformConstraint::any(),
		}
	}

	/// A dependency pinned to an exact version, used to fix packages during an update.
	pub fn exact(name: impl Into<String>, version: &Version) -> Self {
		Dependency {
			name: name.into(),
			constraint: VersionConstraint::exact(version),
			optional: false,
			extras: Vec::new(),
			python_versions: VersionConstraint::any(),
			platform: PlatformConstraint::any(),
		}
	}
}

impl std::fmt::Display for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.name, self.constraint)
	}
}
