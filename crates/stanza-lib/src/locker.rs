//! Reading and writing the lock snapshot.
//!
//! The snapshot pins every resolved package along with the extras table it
//! was resolved under. A content hash of the declared requirements is stored
//! with it so a stale lock can be detected without re-resolving.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::packages::{Category, Dependency, Package};
use crate::repository::Repository;

/* The declared-requirements keys that participate in the content hash */
const RELEVANT_KEYS: [&str; 4] = ["name", "version", "dependencies", "dev-dependencies"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LockData {
	package: Vec<LockedPackage>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	extras: BTreeMap<String, Vec<String>>,
	metadata: LockMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LockMetadata {
	#[serde(rename = "python-versions")]
	python_versions: String,
	platform: String,
	#[serde(rename = "content-hash")]
	content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LockedPackage {
	name: String,
	version: String,
	category: Category,
	optional: bool,
	#[serde(rename = "python-versions")]
	python_versions: String,
	platform: String,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	requirements: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	dependencies: BTreeMap<String, String>,
}

pub struct Locker {
	lock: PathBuf,
	content_hash: String,
	lock_data: Option<LockData>,
}

impl Locker {
	/// `local_config` is the declared-requirements document the freshness
	/// hash is computed from; only [`RELEVANT_KEYS`] participate.
	pub fn new(lock: impl Into<PathBuf>, local_config: &serde_json::Value) -> Self {
		Locker {
			lock: lock.into(),
			content_hash: content_hash_of(local_config),
			lock_data: None,
		}
	}

	/// Whether a lock snapshot exists and is readable.
	pub fn is_locked(&mut self) -> bool {
		self.lock.exists() && self.lock_data().is_ok()
	}

	/// Whether the snapshot still matches the current declared requirements.
	pub fn is_fresh(&mut self) -> bool {
		let content_hash = self.content_hash.clone();
		match self.lock_data() {
			Ok(data) => data.metadata.content_hash == content_hash,
			Err(_) => false,
		}
	}

	/// The extras table persisted with the lock.
	pub fn extras(&mut self) -> crate::Result<BTreeMap<String, Vec<String>>> {
		Ok(self.lock_data()?.extras.clone())
	}

	/// The locked package set. `complete` includes dev category packages.
	pub fn locked_repository(&mut self, complete: bool) -> crate::Result<Repository> {
		if !self.is_locked() {
			return Ok(Repository::new());
		}

		let data = self.lock_data()?.clone();
		let mut repository = Repository::new();
		for info in &data.package {
			if !complete && info.category == Category::Dev {
				continue;
			}

			let mut package = Package::new(&info.name, &info.version)?;
			package.category = info.category;
			package.optional = info.optional;
			package.set_python_versions(&info.python_versions)?;
			package.platform = info.platform.clone();
			package.requirements = info.requirements.clone();
			for (name, constraint) in &info.dependencies {
				package.requires.push(Dependency::new(name, constraint)?);
			}

			repository.add(package)?;
		}

		Ok(repository)
	}

	/// Replaces the snapshot with `packages`, resolved for `root`.
	///
	/// Returns whether anything was actually written.
	pub fn set_lock_data(&mut self, root: &Package, packages: &[Package]) -> crate::Result<bool> {
		let mut locked: Vec<LockedPackage> = packages.iter().map(dump_package).collect();
		locked.sort_by(|a, b| a.name.cmp(&b.name));

		let lock = LockData {
			package: locked,
			extras: root.extras.clone(),
			metadata: LockMetadata {
				python_versions: root.python_versions().to_string(),
				platform: root.platform.clone(),
				content_hash: self.content_hash.clone(),
			},
		};

		let changed = !self.is_locked() || self.lock_data()? != &lock;
		if changed {
			self.write_lock_data(lock)?;
		}

		Ok(changed)
	}

	fn lock_data(&mut self) -> crate::Result<&LockData> {
		if self.lock_data.is_none() {
			if !self.lock.exists() {
				return Err(crate::Error::NotLocked);
			}
			let raw = std::fs::read_to_string(&self.lock)?;
			self.lock_data = Some(serde_json::from_str(&raw)?);
		}
		match &self.lock_data {
			Some(data) => Ok(data),
			None => Err(crate::Error::NotLocked),
		}
	}

	fn write_lock_data(&mut self, data: LockData) -> crate::Result<()> {
		log::info!("Writing lock data to {}", self.lock.display());
		std::fs::write(&self.lock, serde_json::to_string_pretty(&data)?)?;
		self.lock_data = Some(data);
		Ok(())
	}
}

/// Hash of the declared requirements, taken over a fixed key order.
fn content_hash_of(local_config: &serde_json::Value) -> String {
	let relevant: Vec<(&str, &serde_json::Value)> = RELEVANT_KEYS.iter()
		.map(|key| (*key, local_config.get(key).unwrap_or(&serde_json::Value::Null)))
		.collect();
	/* Serialization of the pair list cannot fail */
	let serialized = serde_json::to_string(&relevant).unwrap_or_default();
	sha256::digest(serialized)
}

fn dump_package(package: &Package) -> LockedPackage {
	let mut dependencies = BTreeMap::new();
	for dependency in &package.requires {
		if dependency.optional {
			continue;
		}
		dependencies.insert(dependency.name.clone(), dependency.constraint.to_string());
	}

	LockedPackage {
		name: package.name().to_string(),
		version: package.version().to_string(),
		category: package.category,
		optional: package.optional,
		python_versions: package.python_versions().to_string(),
		platform: package.platform.clone(),
		requirements: package.requirements.clone(),
		dependencies,
	}
}
