//! Name keyed package sets.

use crate::environment::Environment;
use crate::packages::Package;

/// A set of packages holding at most one entry per package name.
///
/// Three instances exist during a run: the locked snapshot, the observed
/// installed set and the local set the run is building towards.
#[derive(Debug, Clone, Default)]
pub struct Repository {
	packages: Vec<Package>,
}

impl Repository {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn packages(&self) -> &[Package] {
		&self.packages
	}

	pub fn len(&self) -> usize {
		self.packages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.packages.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn get(&self, name: &str) -> Option<&Package> {
		self.packages.iter().find(|p| p.name() == name)
	}

	/// Fails when a package of the same name is already present.
	pub fn add(&mut self, package: Package) -> crate::Result<()> {
		if self.contains(package.name()) {
			return Err(crate::Error::AlreadyExists(package.name().to_string()));
		}
		log::trace!("Adding package {} to repository", package);
		self.packages.push(package);
		Ok(())
	}

	/// Removes the entry with the given name, if any.
	pub fn remove(&mut self, name: &str) {
		log::trace!("Removing package {} from repository", name);
		self.packages.retain(|p| p.name() != name);
	}
}

/// Loads the set of packages physically present in a target environment.
pub trait InstalledSource {
	fn load(&self, environment: &Environment) -> crate::Result<Repository>;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn repository_rejects_duplicate_names() {
		let mut repository = Repository::new();
		repository.add(Package::new("A", "1.0").unwrap()).unwrap();
		assert!(matches!(
			repository.add(Package::new("A", "2.0").unwrap()),
			Err(crate::Error::AlreadyExists(_))
		));
	}

	#[test]
	fn repository_remove_is_by_name() {
		let mut repository = Repository::new();
		repository.add(Package::new("A", "1.0").unwrap()).unwrap();
		repository.remove("A");
		assert!(repository.is_empty());
	}
}
