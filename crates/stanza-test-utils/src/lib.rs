//! Fixture builders and recording collaborators for testing the planner.

use stanza::environment::Environment;
use stanza::installer::backend::InstallBackend;
use stanza::installer::report::Report;
use stanza::installer::Operation;
use stanza::packages::{Category, Dependency, Package, Version};
use stanza::repository::{InstalledSource, Repository};
use stanza::solver::Solver;

/// A plain main category package.
pub fn package(name: &str, version: &str) -> Package {
	Package::new(name, version).expect("invalid fixture version")
}

/// A dev category package.
pub fn dev_package(name: &str, version: &str) -> Package {
	let mut package = package(name, version);
	package.category = Category::Dev;
	package
}

/// An optional package, only wanted through an extra.
pub fn optional_package(name: &str, version: &str) -> Package {
	let mut package = package(name, version);
	package.optional = true;
	package
}

pub fn repository(packages: Vec<Package>) -> Repository {
	let mut repository = Repository::new();
	for package in packages {
		repository.add(package).expect("duplicate fixture package");
	}
	repository
}

/// The common test baseline: python 3.7.1 on linux.
pub fn environment() -> Environment {
	Environment::new(Version::new("3.7.1").expect("invalid fixture version"), "linux")
}

/// A locker over a fresh temporary directory.
///
/// The returned [`tempfile::TempDir`] must outlive the locker or the lock
/// file disappears from under it.
pub fn locker(local_config: serde_json::Value) -> (stanza::Locker, tempfile::TempDir) {
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	let locker = stanza::Locker::new(dir.path().join("stanza.lock"), &local_config);
	(locker, dir)
}

/// Writes `packages` as a lock snapshot and returns a locker reading it back.
///
/// The root package's extras declaration ends up in the lock's extras table.
pub fn locked(root: &Package, packages: &[Package], local_config: serde_json::Value) -> (stanza::Locker, tempfile::TempDir) {
	let (mut locker, dir) = locker(local_config);
	locker.set_lock_data(root, packages).expect("failed to write fixture lock");
	(locker, dir)
}

/// An installed-state probe returning a fixed snapshot.
pub struct FixedInstalled(pub Vec<Package>);

impl InstalledSource for FixedInstalled {
	fn load(&self, _environment: &Environment) -> stanza::Result<Repository> {
		let mut repository = Repository::new();
		for package in &self.0 {
			repository.add(package.clone())?;
		}
		Ok(repository)
	}
}

/// Records every backend call without touching anything.
#[derive(Debug, Default)]
pub struct RecordingBackend {
	/// `name:version` per install.
	pub installed: Vec<String>,
	/// `(initial version, name:version)` per update.
	pub updated: Vec<(String, String)>,
	/// Package name per removal.
	pub removed: Vec<String>,
}

impl RecordingBackend {
	pub fn call_count(&self) -> usize {
		self.installed.len() + self.updated.len() + self.removed.len()
	}
}

impl InstallBackend for RecordingBackend {
	fn install(&mut self, package: &Package) -> stanza::Result<()> {
		self.installed.push(format!("{}:{}", package.name(), package.version()));
		Ok(())
	}

	fn update(&mut self, initial: &Package, target: &Package) -> stanza::Result<()> {
		self.updated.push((initial.version().to_string(), format!("{}:{}", target.name(), target.version())));
		Ok(())
	}

	fn remove(&mut self, package: &Package) -> stanza::Result<()> {
		self.removed.push(package.name().to_string());
		Ok(())
	}
}

/// Collects progress lines for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReport {
	pub lines: Vec<String>,
}

impl Report for RecordingReport {
	fn writeln(&mut self, line: &str) {
		self.lines.push(line.to_string());
	}
}

/// A solver stub that hands back a canned operation list.
#[derive(Debug, Default)]
pub struct StubSolver {
	pub operations: Vec<Operation>,
	pub calls: usize,
	pub last_request: Vec<Dependency>,
	pub last_fixed: Vec<Dependency>,
}

impl StubSolver {
	pub fn new(operations: Vec<Operation>) -> Self {
		StubSolver { operations, calls: 0, last_request: Vec::new(), last_fixed: Vec::new() }
	}
}

impl Solver for StubSolver {
	fn solve(&mut self, request: &[Dependency], fixed: &[Dependency]) -> stanza::Result<Vec<Operation>> {
		self.calls += 1;
		self.last_request = request.to_vec();
		self.last_fixed = fixed.to_vec();
		Ok(self.operations.clone())
	}
}

/// A solver that cannot satisfy anything.
#[derive(Debug, Default)]
pub struct FailingSolver;

impl Solver for FailingSolver {
	fn solve(&mut self, _request: &[Dependency], _fixed: &[Dependency]) -> stanza::Result<Vec<Operation>> {
		Err(stanza::Error::Resolution("no version matching the requirement".to_string()))
	}
}
