//! Error types for address reflection.

use reinhardt_history::HistoryError;

/// Error type for reflector and router operations.
#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
	/// A native history write failed.
	#[error(transparent)]
	History(#[from] HistoryError),
	/// The router already carries an address reflector.
	#[error("router `{0}` already has an address reflector")]
	DuplicateReflector(String),
	/// The reflector outlived its router.
	#[error("router was dropped before its reflector was installed")]
	RouterDropped,
}
