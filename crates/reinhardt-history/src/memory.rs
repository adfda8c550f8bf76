//! In-process session history.
//!
//! [`MemoryHistory`] behaves like `window.history` for a single tab: a stack
//! of entries with a cursor, push truncating forward entries, and traversal
//! firing the pop listener. It backs the registry on native targets and in
//! tests.

use crate::error::HistoryError;
use crate::native::{NativeHistory, NativeHooks, PopEvent, StateChange};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;

/// A single session-history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
	/// Entry state, `None` for `null`.
	pub state: Option<Value>,
	/// Title argument the entry was written with.
	pub title: String,
	/// Resolved URL of the entry.
	pub url: String,
}

/// In-memory [`NativeHistory`] implementation.
pub struct MemoryHistory {
	entries: RefCell<Vec<HistoryEntry>>,
	index: Cell<usize>,
	hooks: RefCell<Option<NativeHooks>>,
	native_writes: Cell<usize>,
	hook_installs: Cell<usize>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial_url` with a `null` state.
	pub fn new(initial_url: impl Into<String>) -> Self {
		Self {
			entries: RefCell::new(vec![HistoryEntry {
				state: None,
				title: String::new(),
				url: initial_url.into(),
			}]),
			index: Cell::new(0),
			hooks: RefCell::new(None),
			native_writes: Cell::new(0),
			hook_installs: Cell::new(0),
		}
	}

	/// Returns the current entry.
	pub fn current(&self) -> HistoryEntry {
		self.entries.borrow()[self.index.get()].clone()
	}

	/// Returns a copy of every entry, oldest first.
	pub fn entries(&self) -> Vec<HistoryEntry> {
		self.entries.borrow().clone()
	}

	/// Number of entries (`history.length`).
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Always `false`: a history has at least its initial entry.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Position of the current entry.
	pub fn index(&self) -> usize {
		self.index.get()
	}

	/// Number of native push/replace writes performed so far.
	pub fn native_write_count(&self) -> usize {
		self.native_writes.get()
	}

	/// Number of times [`NativeHistory::hook`] actually wrapped this object.
	pub fn hook_install_count(&self) -> usize {
		self.hook_installs.get()
	}

	/// Calls the public `pushState` entry point, the way foreign code would.
	///
	/// Once hooked this runs the hook instead of the native write.
	pub fn call_push_state(
		&self,
		state: Option<Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		let hook = self.hooks.borrow().as_ref().map(|h| h.push_state.clone());
		match hook {
			Some(hook) => {
				hook(StateChange::new(state, title, url));
				Ok(())
			}
			None => self.push_state(state.as_ref(), title, url),
		}
	}

	/// Calls the public `replaceState` entry point, the way foreign code would.
	pub fn call_replace_state(
		&self,
		state: Option<Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		let hook = self.hooks.borrow().as_ref().map(|h| h.replace_state.clone());
		match hook {
			Some(hook) => {
				hook(StateChange::new(state, title, url));
				Ok(())
			}
			None => self.replace_state(state.as_ref(), title, url),
		}
	}

	/// Goes one entry back. Returns `false` at the start of the history.
	pub fn back(&self) -> bool {
		self.go(-1)
	}

	/// Goes one entry forward. Returns `false` at the end of the history.
	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Traverses `delta` entries and fires the pop listener.
	///
	/// Out-of-range or zero deltas are ignored, like `history.go`.
	pub fn go(&self, delta: isize) -> bool {
		let target = self.index.get() as isize + delta;
		if delta == 0 || target < 0 || target as usize >= self.len() {
			return false;
		}
		self.index.set(target as usize);

		let state = self.current().state;
		let listener = self.hooks.borrow().as_ref().map(|h| h.pop_state.clone());
		if let Some(listener) = listener {
			listener(PopEvent { state });
		}
		true
	}

	fn resolve(&self, url: &str) -> String {
		let current = self.current().url;
		if url.is_empty() {
			current
		} else if url.starts_with('#') {
			let base = current.split('#').next().unwrap_or_default();
			format!("{base}{url}")
		} else if url.starts_with('?') {
			let base = current.split(['?', '#']).next().unwrap_or_default();
			format!("{base}{url}")
		} else {
			url.to_string()
		}
	}

	fn entry(&self, state: Option<&Value>, title: &str, url: &str) -> HistoryEntry {
		HistoryEntry {
			state: state.cloned(),
			title: title.to_string(),
			url: self.resolve(url),
		}
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl NativeHistory for MemoryHistory {
	fn push_state(&self, state: Option<&Value>, title: &str, url: &str) -> Result<(), HistoryError> {
		let entry = self.entry(state, title, url);
		let next = self.index.get() + 1;
		{
			let mut entries = self.entries.borrow_mut();
			entries.truncate(next);
			entries.push(entry);
		}
		self.index.set(next);
		self.native_writes.set(self.native_writes.get() + 1);
		Ok(())
	}

	fn replace_state(
		&self,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		let entry = self.entry(state, title, url);
		self.entries.borrow_mut()[self.index.get()] = entry;
		self.native_writes.set(self.native_writes.get() + 1);
		Ok(())
	}

	fn location(&self) -> String {
		self.current().url
	}

	fn is_hooked(&self) -> bool {
		self.hooks.borrow().is_some()
	}

	fn hook(&self, hooks: NativeHooks) -> Result<(), HistoryError> {
		*self.hooks.borrow_mut() = Some(hooks);
		self.hook_installs.set(self.hook_installs.get() + 1);
		Ok(())
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("entries", &self.entries.borrow())
			.field("index", &self.index.get())
			.field("hooked", &self.is_hooked())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::rc::Rc;

	#[rstest]
	fn test_push_truncates_forward_entries() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state(None, "", "/a").unwrap();
		history.push_state(None, "", "/b").unwrap();
		assert!(history.back());

		// Act
		history.push_state(None, "", "/c").unwrap();

		// Assert
		let urls: Vec<_> = history.entries().into_iter().map(|e| e.url).collect();
		assert_eq!(urls, vec!["/", "/a", "/c"]);
		assert_eq!(history.index(), 2);
		assert!(!history.forward());
	}

	#[rstest]
	fn test_replace_keeps_length() {
		let history = MemoryHistory::new("/");
		history
			.replace_state(Some(&json!({"k": 1})), "", "/home")
			.unwrap();

		assert_eq!(history.len(), 1);
		assert_eq!(history.location(), "/home");
		assert_eq!(history.current().state, Some(json!({"k": 1})));
		assert_eq!(history.native_write_count(), 1);
	}

	#[rstest]
	#[case("/page?x=1#top", "#/about", "/page?x=1#/about")]
	#[case("/page?x=1#top", "?y=2", "/page?y=2")]
	#[case("/page", "", "/page")]
	#[case("/page", "/other", "/other")]
	fn test_relative_urls_resolve_against_current(
		#[case] current: &str,
		#[case] url: &str,
		#[case] expected: &str,
	) {
		let history = MemoryHistory::new(current);
		history.push_state(None, "", url).unwrap();
		assert_eq!(history.location(), expected);
	}

	#[rstest]
	fn test_go_fires_pop_listener_with_entry_state() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state(Some(&json!({"n": 1})), "", "/one").unwrap();
		history.push_state(Some(&json!({"n": 2})), "", "/two").unwrap();
		let popped: Rc<RefCell<Vec<PopEvent>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&popped);
		history
			.hook(NativeHooks {
				push_state: Rc::new(|_| {}),
				replace_state: Rc::new(|_| {}),
				pop_state: Rc::new(move |event| sink.borrow_mut().push(event)),
			})
			.unwrap();

		// Act
		assert!(history.go(-2));
		assert!(!history.go(-1));
		assert!(history.forward());

		// Assert
		assert_eq!(
			*popped.borrow(),
			vec![
				PopEvent { state: None },
				PopEvent {
					state: Some(json!({"n": 1}))
				},
			]
		);
		assert_eq!(history.location(), "/one");
	}

	#[rstest]
	fn test_public_entry_points_route_to_hooks_once_hooked() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.call_push_state(None, "", "/before").unwrap();
		let seen: Rc<RefCell<Vec<StateChange>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		history
			.hook(NativeHooks {
				push_state: Rc::new(move |change| sink.borrow_mut().push(change)),
				replace_state: Rc::new(|_| {}),
				pop_state: Rc::new(|_| {}),
			})
			.unwrap();

		// Act
		history.call_push_state(None, "", "/after").unwrap();

		// Assert: only the unhooked call reached the native stack
		assert_eq!(history.native_write_count(), 1);
		assert_eq!(history.location(), "/before");
		assert_eq!(seen.borrow()[0].url, "/after");
		assert!(history.is_hooked());
		assert_eq!(history.hook_install_count(), 1);
	}
}
