use serde_json::json;
use stanza::packages::Dependency;
use stanza::Installer;

/// Selecting an extra pulls in the packages it names and, transitively,
/// their own requirements; none of them may be skipped as "not required".
#[test]
fn selected_extra_pulls_in_transitive_requirements() {
	let mut root = stanza_test_utils::package("root", "0.1.0");
	root.extras.insert("x".to_string(), vec!["C".to_string()]);

	let mut c = stanza_test_utils::optional_package("C", "1.0");
	c.requires.push(Dependency::any("D"));
	let d = stanza_test_utils::optional_package("D", "1.0");

	let (mut locker, _dir) = stanza_test_utils::locked(&root, &[c, d], json!({ "name": "root" }));

	let mut report = stanza_test_utils::RecordingReport::default();
	let mut solver = stanza_test_utils::StubSolver::default();
	let mut backend = stanza_test_utils::RecordingBackend::default();

	let mut installer = Installer::new(
		&mut report,
		stanza_test_utils::environment(),
		root,
		&mut locker,
		&mut solver,
		&mut backend,
		stanza::Repository::new(),
	)
	.verbose(true)
	.extras(vec!["x".to_string()]);

	assert_eq!(installer.run().unwrap(), 0);

	assert_eq!(backend.installed, vec!["C:1.0".to_string(), "D:1.0".to_string()]);
	assert!(!report.lines.iter().any(|l| l.contains("Not required")));
}

/// A previously installed extra package is removed once its extra is no
/// longer selected.
#[test]
fn deselected_extra_packages_are_removed() {
	let mut root = stanza_test_utils::package("root", "0.1.0");
	root.extras.insert("x".to_string(), vec!["C".to_string()]);

	let (mut locker, _dir) = stanza_test_utils::locked(
		&root,
		&[stanza_test_utils::optional_package("C", "1.0")],
		json!({ "name": "root" }),
	);

	let installed = stanza_test_utils::repository(vec![stanza_test_utils::optional_package("C", "1.0")]);

	let mut report = stanza_test_utils::RecordingReport::default();
	let mut solver = stanza_test_utils::StubSolver::default();
	let mut backend = stanza_test_utils::RecordingBackend::default();

	let mut installer = Installer::new(
		&mut report,
		stanza_test_utils::environment(),
		root,
		&mut locker,
		&mut solver,
		&mut backend,
		installed,
	);

	assert_eq!(installer.run().unwrap(), 0);
	assert_eq!(backend.removed, vec!["C".to_string()]);
}

/// Requesting an extra the lock never declared is a configuration error,
/// raised before any planning happens.
#[test]
fn unknown_extra_is_a_configuration_error() {
	let root = stanza_test_utils::package("root", "0.1.0");
	let (mut locker, _dir) = stanza_test_utils::locked(
		&root,
		&[stanza_test_utils::package("A", "1.0")],
		json!({ "name": "root" }),
	);

	let mut report = stanza_test_utils::RecordingReport::default();
	let mut solver = stanza_test_utils::StubSolver::default();
	let mut backend = stanza_test_utils::RecordingBackend::default();

	let mut installer = Installer::new(
		&mut report,
		stanza_test_utils::environment(),
		root,
		&mut locker,
		&mut solver,
		&mut backend,
		stanza::Repository::new(),
	)
	.extras(vec!["nope".to_string()]);

	assert!(matches!(installer.run(), Err(stanza::Error::ExtraNotSpecified(_))));
	assert_eq!(backend.call_count(), 0);
}
