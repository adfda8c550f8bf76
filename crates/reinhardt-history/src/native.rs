//! The native history surface wrapped by the hook registry.

use crate::error::HistoryError;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Arguments of a `pushState` / `replaceState` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
	/// The state object, `None` for a `null` state.
	pub state: Option<Value>,
	/// The (unused by browsers) title argument.
	pub title: String,
	/// The target URL, possibly relative.
	pub url: String,
}

impl StateChange {
	/// Creates a state change.
	pub fn new(state: Option<Value>, title: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			state,
			title: title.into(),
			url: url.into(),
		}
	}
}

/// A back/forward traversal notification (`popstate`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopEvent {
	/// State of the entry the browser traversed to.
	pub state: Option<Value>,
}

/// Callbacks a [`NativeHistory`] routes its entry points to once hooked.
#[derive(Clone)]
pub struct NativeHooks {
	/// Replaces the native `pushState`.
	pub push_state: Rc<dyn Fn(StateChange)>,
	/// Replaces the native `replaceState`.
	pub replace_state: Rc<dyn Fn(StateChange)>,
	/// Listener for back/forward traversal.
	pub pop_state: Rc<dyn Fn(PopEvent)>,
}

impl fmt::Debug for NativeHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeHooks").finish_non_exhaustive()
	}
}

/// Native session-history backend.
///
/// `push_state` / `replace_state` are always the *original* native
/// operations: after [`NativeHistory::hook`] they stay reachable through these
/// methods while foreign callers of the public entry points are routed to the
/// hooks instead.
pub trait NativeHistory {
	/// Appends an entry (native `pushState`).
	fn push_state(&self, state: Option<&Value>, title: &str, url: &str) -> Result<(), HistoryError>;

	/// Replaces the current entry (native `replaceState`).
	fn replace_state(
		&self,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError>;

	/// Current composite URL: path, query and fragment.
	fn location(&self) -> String;

	/// Whether the public entry points already carry hooks.
	fn is_hooked(&self) -> bool;

	/// Re-points the public entry points at `hooks` and marks the object as
	/// hooked.
	fn hook(&self, hooks: NativeHooks) -> Result<(), HistoryError>;
}
