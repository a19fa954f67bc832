//! Install plan operations and their skip annotations.

use crate::packages::Package;

/// A single action needed to bring the environment in line with the target set.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
	Install { package: Package },
	/// `initial` and `target` share a name and differ in version.
	Update { initial: Package, target: Package },
	Uninstall { package: Package },
}

/// The dispatch kind of an operation, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
	Install,
	Update,
	Uninstall,
}

impl Operation {
	pub fn install(package: Package) -> Self {
		Operation::Install { package }
	}

	pub fn update(initial: Package, target: Package) -> Self {
		Operation::Update { initial, target }
	}

	pub fn uninstall(package: Package) -> Self {
		Operation::Uninstall { package }
	}

	pub fn job_kind(&self) -> JobKind {
		match self {
			Operation::Install { .. } => JobKind::Install,
			Operation::Update { .. } => JobKind::Update,
			Operation::Uninstall { .. } => JobKind::Uninstall,
		}
	}

	/// The package the operation acts towards; the target for updates.
	pub fn package(&self) -> &Package {
		match self {
			Operation::Install { package } | Operation::Uninstall { package } => package,
			Operation::Update { target, .. } => target,
		}
	}
}

/// Why an operation was marked inapplicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	PythonVersion,
	Platform,
	NotRequired,
	DevDependenciesNotRequested,
}

impl std::fmt::Display for SkipReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SkipReason::PythonVersion => write!(f, "Not needed for the current python version"),
			SkipReason::Platform => write!(f, "Not needed for the current platform"),
			SkipReason::NotRequired => write!(f, "Not required"),
			SkipReason::DevDependenciesNotRequested => write!(f, "Dev dependencies not requested"),
		}
	}
}

/// An ordered operation list with skip verdicts held off to the side.
///
/// Operations stay immutable values; the filter annotates them by index.
/// A verdict is only ever written, never cleared.
#[derive(Debug, Clone, Default)]
pub struct Plan {
	operations: Vec<Operation>,
	verdicts: Vec<Option<SkipReason>>,
}

impl Plan {
	pub fn new(operations: Vec<Operation>) -> Self {
		let verdicts = vec![None; operations.len()];
		Plan { operations, verdicts }
	}

	pub fn operations(&self) -> &[Operation] {
		&self.operations
	}

	pub fn len(&self) -> usize {
		self.operations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}

	/// Marks the operation at `index` skipped. A later verdict overwrites an
	/// earlier one; the last written reason is reported.
	pub fn skip(&mut self, index: usize, reason: SkipReason) {
		if let Some(verdict) = self.verdicts.get_mut(index) {
			*verdict = Some(reason);
		}
	}

	pub fn is_skipped(&self, index: usize) -> bool {
		self.skip_reason(index).is_some()
	}

	pub fn skip_reason(&self, index: usize) -> Option<SkipReason> {
		self.verdicts.get(index).copied().flatten()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Operation, Option<SkipReason>)> {
		self.operations.iter().zip(self.verdicts.iter().copied())
	}
}
