//! Error types for native history access.

/// Error returned by native (unhooked) history operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
	/// No `window` / `window.history` is reachable from this context.
	#[error("browser history API is unavailable")]
	Unavailable,
	/// The native call threw (e.g. state quota exceeded, cross-origin URL).
	#[error("native history call failed: {0}")]
	NativeCall(String),
	/// The state object could not be represented for the native call.
	#[error("history state is not representable: {0}")]
	State(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_history_error_display() {
		assert_eq!(
			HistoryError::Unavailable.to_string(),
			"browser history API is unavailable"
		);
		assert_eq!(
			HistoryError::NativeCall("QuotaExceededError".to_string()).to_string(),
			"native history call failed: QuotaExceededError"
		);
	}

	#[rstest]
	fn test_history_error_from_serde() {
		// Arrange
		let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

		// Act
		let err: HistoryError = err.into();

		// Assert
		assert!(matches!(err, HistoryError::State(_)));
		assert!(err.to_string().starts_with("history state is not representable"));
	}
}
