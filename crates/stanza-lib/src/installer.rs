//! Reconciles declared requirements, the lock snapshot and the live
//! environment into an ordered operation list, then applies it.
//!
//! # Usage
//! 1. Create an [`Installer`] with its collaborators and an [`Environment`].
//! 1. Configure it through the chainable setters (dry run, dev mode, extras, ...).
//! 1. [`Installer::run()`] plans, reports and executes the operations.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::environment::Environment;
use crate::locker::Locker;
use crate::packages::{Category, Dependency, Package, PlatformConstraint, VersionConstraint};
use crate::repository::Repository;
use crate::solver::Solver;

mod operation;
pub use operation::Operation;
pub use operation::JobKind;
pub use operation::Plan;
pub use operation::SkipReason;

pub mod backend;
pub use backend::InstallBackend;

pub mod report;
pub use report::Report;
pub use report::LogReport;

pub struct Installer<'a> {
	report: &'a mut dyn Report,
	environment: Environment,
	package: Package,
	locker: &'a mut Locker,
	solver: &'a mut dyn Solver,
	backend: &'a mut dyn InstallBackend,
	installed: Repository,

	dry_run: bool,
	update: bool,
	verbose: bool,
	write_lock: bool,
	dev_mode: bool,
	execute_operations: bool,

	whitelist: Vec<String>,
	extras: Vec<String>,
}

impl<'a> Installer<'a> {
	pub fn new(
		report: &'a mut dyn Report,
		environment: Environment,
		package: Package,
		locker: &'a mut Locker,
		solver: &'a mut dyn Solver,
		backend: &'a mut dyn InstallBackend,
		installed: Repository,
	) -> Self {
		Installer {
			report,
			environment,
			package,
			locker,
			solver,
			backend,
			installed,
			dry_run: false,
			update: false,
			verbose: false,
			write_lock: true,
			dev_mode: true,
			execute_operations: true,
			whitelist: Vec::new(),
			extras: Vec::new(),
		}
	}

	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	pub fn is_dry_run(&self) -> bool {
		self.dry_run
	}

	pub fn verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}

	pub fn is_verbose(&self) -> bool {
		self.verbose
	}

	pub fn dev_mode(mut self, dev_mode: bool) -> Self {
		self.dev_mode = dev_mode;
		self
	}

	pub fn is_dev_mode(&self) -> bool {
		self.dev_mode
	}

	pub fn update(mut self, update: bool) -> Self {
		self.update = update;
		self
	}

	pub fn is_updating(&self) -> bool {
		self.update
	}

	pub fn write_lock(mut self, write_lock: bool) -> Self {
		self.write_lock = write_lock;
		self
	}

	pub fn execute_operations(mut self, execute: bool) -> Self {
		self.execute_operations = execute;
		self
	}

	/// Package names allowed to change version during an update; everything
	/// else in the lock stays fixed.
	pub fn whitelist(mut self, whitelist: Vec<String>) -> Self {
		self.whitelist = whitelist;
		self
	}

	pub fn extras(mut self, extras: Vec<String>) -> Self {
		self.extras = extras;
		self
	}

	pub fn run(&mut self) -> crate::Result<i32> {
		/* Force an update when there is no lock to install from */
		if !self.update && !self.locker.is_locked() {
			self.update = true;
		}

		if self.dry_run {
			self.verbose = true;
			self.write_lock = false;
			self.execute_operations = false;
		}

		let mut local = Repository::new();
		self.do_install(&mut local)?;

		Ok(0)
	}

	fn do_install(&mut self, local: &mut Repository) -> crate::Result<()> {
		let (locked, mut plan) = if self.update {
			let locked = if self.locker.is_locked() {
				self.locker.locked_repository(true)?
			} else {
				Repository::new()
			};

			for extra in &self.extras {
				if !self.package.extras.contains_key(extra) {
					return Err(crate::Error::ExtraNotSpecified(extra.clone()));
				}
			}

			self.report.writeln("Updating dependencies");

			/* Packages outside the whitelist stay fixed to their locked version */
			let mut fixed = Vec::new();
			if !self.whitelist.is_empty() {
				for candidate in locked.packages() {
					if self.whitelist.iter().all(|name| name != candidate.name()) {
						fixed.push(Dependency::exact(candidate.name(), candidate.version()));
					}
				}
			}

			let mut request = self.package.requires.clone();
			request.extend(self.package.dev_requires.iter().cloned());

			let operations = self.solver.solve(&request, &fixed)?;

			(locked, Plan::new(operations))
		} else {
			self.report.writeln("Installing dependencies from lock file");

			let locked = self.locker.locked_repository(true)?;

			if !self.locker.is_fresh() {
				self.report.writeln(
					"Warning: The lock file is not up to date with the latest changes in your declared requirements. \
					You may be getting outdated dependencies. Run update to update them.",
				);
			}

			let lock_extras = self.locker.extras()?;
			for extra in &self.extras {
				if !lock_extras.contains_key(extra) {
					return Err(crate::Error::ExtraNotSpecified(extra.clone()));
				}
			}

			let operations = self.operations_from_lock(&locked)?;

			(locked, Plan::new(operations))
		};

		Self::populate_local_repository(local, &plan, &locked)?;
		self.filter_operations(&mut plan, local)?;
		self.report_summary(&plan);

		/* The lock is written before execution; a failing backend call must
		   not lose the computed snapshot. Rerunning an install reconciles the
		   environment with it. */
		if self.update && self.write_lock {
			let changed = self.locker.set_lock_data(&self.package, local.packages())?;
			if changed {
				self.report.writeln("Writing lock file");
			}
		}

		for index in 0..plan.len() {
			self.execute(&plan, index)?;
		}

		Ok(())
	}

	/// Diffs the locked set against the installed set. Install-mode only.
	fn operations_from_lock(&mut self, locked: &Repository) -> crate::Result<Vec<Operation>> {
		let extra_names: HashSet<String> = self.extra_packages(locked)?
			.into_iter()
			.map(|dependency| dependency.name)
			.collect();

		let mut operations = Vec::new();
		for package in locked.packages() {
			match self.installed.get(package.name()) {
				Some(installed) => {
					/* Group exclusion takes precedence over the version check */
					if package.category == Category::Dev && !self.dev_mode {
						operations.push(Operation::uninstall(package.clone()));
					} else if package.optional && !extra_names.contains(package.name()) {
						/* Installed through an extra that is no longer requested */
						operations.push(Operation::uninstall(package.clone()));
					} else if installed.version() != package.version() {
						operations.push(Operation::update(installed.clone(), package.clone()));
					}
				}
				None => {
					if package.optional && !extra_names.contains(package.name()) {
						continue;
					}
					operations.push(Operation::install(package.clone()));
				}
			}
		}

		Ok(operations)
	}

	/// Replays the plan over the locked set to get the exact package set the
	/// environment will hold after execution.
	fn populate_local_repository(local: &mut Repository, plan: &Plan, locked: &Repository) -> crate::Result<()> {
		for package in locked.packages() {
			if !local.contains(package.name()) {
				local.add(package.clone())?;
			}
		}

		for operation in plan.operations() {
			let package = operation.package();

			match local.get(package.name()).cloned() {
				Some(existing) => match operation {
					Operation::Update { target, .. } => {
						if existing.version() != target.version() {
							local.remove(existing.name());
							local.add(target.clone())?;
						}
					}
					Operation::Uninstall { .. } => {
						local.remove(existing.name());
					}
					_ => {
						/* A fresh install wins over a stale locked entry of the same name */
						local.remove(existing.name());
						local.add(package.clone())?;
					}
				},
				None => {
					local.add(package.clone())?;
				}
			}
		}

		Ok(())
	}

	/// Marks operations not applicable to this environment or selection as
	/// skipped. Idempotent over repeated passes on an unchanged plan.
	fn filter_operations(&mut self, plan: &mut Plan, repository: &Repository) -> crate::Result<()> {
		let extra_names: HashSet<String> = self.extra_packages(repository)?
			.into_iter()
			.map(|dependency| dependency.name)
			.collect();

		for index in 0..plan.len() {
			let (job_kind, package) = {
				let operation = &plan.operations()[index];
				(operation.job_kind(), operation.package().clone())
			};

			if job_kind == JobKind::Uninstall {
				continue;
			}

			let python = self.environment.python_version();
			if let Some(expression) = package.requirements.get("python") {
				let constraint = VersionConstraint::parse(expression)?;
				if !constraint.matches(python) {
					plan.skip(index, SkipReason::PythonVersion);
					continue;
				}
			}

			/* The package level constraint can disagree with the requirements
			   map; the two are filled by different loading paths, so both are
			   checked */
			if !package.python_constraint().matches(python) {
				plan.skip(index, SkipReason::PythonVersion);
				continue;
			}

			if let Some(expression) = package.requirements.get("platform") {
				let constraint = PlatformConstraint::parse(expression)?;
				if !constraint.matches(self.environment.platform()) {
					plan.skip(index, SkipReason::Platform);
					continue;
				}
			}

			/* Both of these always run; the later verdict overwrites */
			if package.optional && !extra_names.contains(package.name()) {
				plan.skip(index, SkipReason::NotRequired);
			}

			if package.category == Category::Dev && !self.dev_mode {
				plan.skip(index, SkipReason::DevDependenciesNotRequested);
			}
		}

		Ok(())
	}

	/// The extras declaration active for this run.
	///
	/// An update resolves against the live declaration; an install against
	/// what was recorded in the lock.
	fn active_extras(&mut self) -> crate::Result<BTreeMap<String, Vec<String>>> {
		if self.update {
			Ok(self.package.extras.clone())
		} else {
			self.locker.extras()
		}
	}

	/// All dependencies pulled in by the selected extras, transitively.
	fn extra_packages(&mut self, repository: &Repository) -> crate::Result<Vec<Dependency>> {
		let extras = self.active_extras()?;

		let mut queue: VecDeque<Dependency> = VecDeque::new();
		for (extra, names) in &extras {
			if self.extras.iter().any(|selected| selected == extra) {
				queue.extend(names.iter().map(|name| Dependency::any(name.as_str())));
			}
		}

		/* The visited set bounds the walk; a requirement cycle must not hang
		   the planner */
		let mut visited: HashSet<String> = HashSet::new();
		let mut closure = Vec::new();
		while let Some(dependency) = queue.pop_front() {
			if !visited.insert(dependency.name.clone()) {
				continue;
			}
			if let Some(package) = repository.get(&dependency.name) {
				queue.extend(package.requires.iter().cloned());
				closure.push(dependency);
			}
		}

		Ok(closure)
	}

	/// Counts are taken from the unskipped remainder, once, before execution.
	fn report_summary(&mut self, plan: &Plan) {
		if !self.execute_operations && !self.dry_run {
			return;
		}

		let mut installs = 0usize;
		let mut updates = 0usize;
		let mut uninstalls = 0usize;
		let mut skipped = 0usize;
		for (operation, verdict) in plan.iter() {
			if verdict.is_some() {
				skipped += 1;
				continue;
			}
			match operation.job_kind() {
				JobKind::Install => installs += 1,
				JobKind::Update => updates += 1,
				JobKind::Uninstall => uninstalls += 1,
			}
		}

		if installs + updates + uninstalls == 0 {
			self.report.writeln("Nothing to install or update");
			return;
		}

		let mut line = format!(
			"Package operations: {} install{}, {} update{}, {} removal{}",
			installs, plural(installs),
			updates, plural(updates),
			uninstalls, plural(uninstalls),
		);
		if skipped > 0 && self.verbose {
			line.push_str(&format!(", {} skipped", skipped));
		}
		self.report.writeln(&line);
	}

	fn execute(&mut self, plan: &Plan, index: usize) -> crate::Result<()> {
		let operation = &plan.operations()[index];
		let reporting = self.execute_operations || self.dry_run;

		if let Some(reason) = plan.skip_reason(index) {
			if self.verbose && reporting {
				let package = operation.package();
				let notice = match operation.job_kind() {
					JobKind::Uninstall => "Not removing",
					_ => "Skipping",
				};
				self.report.writeln(&format!("  - {} {} ({}) {}", notice, package.name(), package.version(), reason));
			}
			return Ok(());
		}

		if reporting {
			match operation {
				Operation::Install { package } => {
					self.report.writeln(&format!("  - Installing {} ({})", package.name(), package.version()));
				}
				Operation::Update { initial, target } => {
					self.report.writeln(&format!(
						"  - Updating {} ({} -> {})",
						target.name(), initial.version(), target.version()
					));
				}
				Operation::Uninstall { package } => {
					self.report.writeln(&format!("  - Removing {} ({})", package.name(), package.version()));
				}
			}
		}

		if !self.execute_operations {
			return Ok(());
		}

		match operation {
			Operation::Install { package } => self.backend.install(package),
			Operation::Update { initial, target } => self.backend.update(initial, target),
			Operation::Uninstall { package } => self.backend.remove(package),
		}
	}
}

fn plural(count: usize) -> &'static str {
	if count == 1 { "" } else { "s" }
}
