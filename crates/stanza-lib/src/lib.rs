pub mod error;
pub use error::Result;
pub use error::Error;

pub mod packages;
pub use packages::Package;
pub use packages::Dependency;

pub mod repository;
pub use repository::Repository;

pub mod locker;
pub use locker::Locker;

pub mod solver;
pub use solver::Solver;

pub mod environment;
pub use environment::Environment;

pub mod installer;
pub use installer::Installer;
