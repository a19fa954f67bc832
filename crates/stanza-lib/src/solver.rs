//! The version constraint solver collaborator.

use crate::installer::Operation;
use crate::packages::Dependency;

/// Resolves a requirement set against a pool of available packages.
///
/// `fixed` dependencies are pinned to an exact version for the duration of
/// the call. Unsatisfiable constraints must surface as
/// [`crate::Error::Resolution`]; the installer passes them through verbatim.
pub trait Solver {
	fn solve(&mut self, request: &[Dependency], fixed: &[Dependency]) -> crate::Result<Vec<Operation>>;
}
