//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("extra [{0}] is not specified")]
	ExtraNotSpecified(String),
	#[error("resolution failure: {0}")]
	Resolution(String),
	#[error("package {0} already present in repository")]
	AlreadyExists(String),
	#[error("no lock file found")]
	NotLocked,
	#[error("backend failure: {0}")]
	Backend(String),
}
