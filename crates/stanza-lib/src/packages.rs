//! Package and dependency value types.

use std::collections::BTreeMap;

use serde::*;

mod version;
pub use version::Version;

mod constraint;
pub use constraint::VersionConstraint;
pub use constraint::PlatformConstraint;

mod dependency;
pub use dependency::Dependency;

/// Whether a package belongs to the main or the development dependency group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	#[default] Main,
	Dev,
}

/// A single pinned package.
///
/// Identity within a repository is the name alone; equality also compares the version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
	name: String,
	version: Version,
	pub category: Category,
	pub optional: bool,
	/// Extra group name to the ordered dependency names it activates.
	pub extras: BTreeMap<String, Vec<String>>,
	/// Constraint kind ("python", "platform", ...) to its expression.
	pub requirements: BTreeMap<String, String>,
	pub requires: Vec<Dependency>,
	/// Development requirements, only meaningful on the root package.
	pub dev_requires: Vec<Dependency>,
	pub platform: String,
	python_versions: String,
	python_constraint: VersionConstraint,
}

impl Package {
	pub fn new(name: impl Into<String>, version: &str) -> crate::Result<Self> {
		Ok(Package {
			name: name.into(),
			version: Version::new(version)?,
			category: Category::Main,
			optional: false,
			extras: BTreeMap::new(),
			requirements: BTreeMap::new(),
			requires: Vec::new(),
			dev_requires: Vec::new(),
			platform: "*".to_string(),
			python_versions: "*".to_string(),
			python_constraint: VersionConstraint::any(),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	pub fn python_versions(&self) -> &str {
		&self.python_versions
	}

	/// Sets the declared interpreter requirement.
	///
	/// The parsed form is cached so the filter never re-parses it.
	pub fn set_python_versions(&mut self, expression: impl Into<String>) -> crate::Result<()> {
		let expression = expression.into();
		self.python_constraint = VersionConstraint::parse(&expression)?;
		self.python_versions = expression;
		Ok(())
	}

	/// The package level interpreter constraint.
	///
	/// Kept separate from the `requirements` map on purpose; the two are
	/// filled by different loading paths and are both honored by the filter.
	pub fn python_constraint(&self) -> &VersionConstraint {
		&self.python_constraint
	}
}

impl PartialEq for Package {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && self.version == other.version
	}
}

impl Eq for Package {}

impl std::hash::Hash for Package {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.name.hash(state);
		self.version.hash(state);
	}
}

impl std::fmt::Display for Package {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.name, self.version)
	}
}
