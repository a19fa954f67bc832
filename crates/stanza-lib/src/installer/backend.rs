//! The backend that physically applies operations to an environment.

use crate::packages::Package;

/// Performs the actual install, update and removal of packages.
///
/// Calls are synchronous and strictly sequential; a failure aborts the run
/// and propagates to the caller.
pub trait InstallBackend {
	fn install(&mut self, package: &Package) -> crate::Result<()>;
	fn update(&mut self, initial: &Package, target: &Package) -> crate::Result<()>;
	fn remove(&mut self, package: &Package) -> crate::Result<()>;
}
