use serde_json::json;
use stanza::packages::Dependency;
use stanza::{Installer, Locker};

/// Freshness tracks the declared requirements the lock was computed from.
#[test]
fn lock_freshness_follows_declared_requirements() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let config = json!({ "name": "root", "dependencies": { "A": "^1.0" } });
	let (mut locker, dir) = stanza_test_utils::locked(
		&root,
		&[stanza_test_utils::package("A", "1.0")],
		config.clone(),
	);

	assert!(locker.is_locked());
	assert!(locker.is_fresh());

	/* Same lock file, changed declaration */
	let mut stale = Locker::new(
		dir.path().join("stanza.lock"),
		&json!({ "name": "root", "dependencies": { "A": "^2.0" } }),
	);
	assert!(stale.is_locked());
	assert!(!stale.is_fresh());
}

/// Installing from a stale lock warns but proceeds.
#[test]
fn stale_lock_warns_and_proceeds() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let (_locker, dir) = stanza_test_utils::locked(
		&root,
		&[stanza_test_utils::package("A", "1.0")],
		json!({ "name": "root", "dependencies": { "A": "^1.0" } }),
	);

	let mut stale = Locker::new(
		dir.path().join("stanza.lock"),
		&json!({ "name": "root", "dependencies": { "A": "^2.0" } }),
	);

	let mut report = stanza_test_utils::RecordingReport::default();
	let mut solver = stanza_test_utils::StubSolver::default();
	let mut backend = stanza_test_utils::RecordingBackend::default();

	let mut installer = Installer::new(
		&mut report,
		stanza_test_utils::environment(),
		root,
		&mut stale,
		&mut solver,
		&mut backend,
		stanza::Repository::new(),
	);

	assert_eq!(installer.run().unwrap(), 0);

	assert!(report.lines.iter().any(|l| l.starts_with("Warning: The lock file is not up to date")));
	assert_eq!(backend.installed, vec!["A:1.0".to_string()]);
}

/// Writing identical lock data a second time is a no-op.
#[test]
fn set_lock_data_detects_changes() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let packages = vec![stanza_test_utils::package("A", "1.0")];
	let (mut locker, _dir) = stanza_test_utils::locker(json!({ "name": "root" }));

	assert!(locker.set_lock_data(&root, &packages).unwrap());
	assert!(!locker.set_lock_data(&root, &packages).unwrap());
	assert!(locker.set_lock_data(&root, &[stanza_test_utils::package("A", "2.0")]).unwrap());
}

/// The incomplete view hides dev category packages.
#[test]
fn incomplete_repository_excludes_dev_packages() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let (mut locker, _dir) = stanza_test_utils::locked(
		&root,
		&[
			stanza_test_utils::package("A", "1.0"),
			stanza_test_utils::dev_package("B", "1.0"),
		],
		json!({ "name": "root" }),
	);

	let complete = locker.locked_repository(true).unwrap();
	assert!(complete.contains("A") && complete.contains("B"));

	let main_only = locker.locked_repository(false).unwrap();
	assert!(main_only.contains("A") && !main_only.contains("B"));
}

/// Package metadata relevant to filtering survives a lock roundtrip.
#[test]
fn locked_packages_roundtrip_their_metadata() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let mut package = stanza_test_utils::optional_package("C", "1.2.3");
	package.set_python_versions(">=3.6,<4.0").unwrap();
	package.requirements.insert("platform".to_string(), "linux".to_string());
	package.requires.push(Dependency::new("D", "^2.0").unwrap());

	let (mut locker, _dir) = stanza_test_utils::locked(&root, &[package], json!({ "name": "root" }));

	let repository = locker.locked_repository(true).unwrap();
	let loaded = repository.get("C").expect("C missing from lock");

	assert_eq!(loaded.version().to_string(), "1.2.3");
	assert!(loaded.optional);
	assert_eq!(loaded.python_versions(), ">=3.6,<4.0");
	assert_eq!(loaded.requirements.get("platform").map(String::as_str), Some("linux"));
	assert_eq!(loaded.requires.len(), 1);
	assert_eq!(loaded.requires[0].name, "D");
}
