//! Active route state and its observable store.

use reinhardt_history::{HookChain, HookFlow, HookRegistration};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Key under which a redirecting route's URL is persisted.
pub const REDIRECTED_BY_KEY: &str = "redirectedBy";

/// How the active route was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteMode {
	/// A new history entry.
	Push,
	/// The current history entry was replaced.
	Replace,
	/// Browser back/forward; the address bar already shows this route.
	PopState,
}

/// State attached to an active route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
	/// The live route that redirected to this one. Not serializable: it is
	/// flattened to its URL by [`NavigationState::to_history`].
	pub redirected_by: Option<Rc<ActiveRoute>>,
	/// Free-form, serializable fields.
	pub data: Map<String, Value>,
}

impl NavigationState {
	/// Creates an empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a serializable field.
	pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
		self.data.insert(key.into(), value);
		self
	}

	/// Records the route that redirected here.
	pub fn with_redirected_by(mut self, route: ActiveRoute) -> Self {
		self.redirected_by = Some(Rc::new(route));
		self
	}

	/// Rebuilds state from a history entry.
	///
	/// A persisted `redirectedBy` is already a plain URL string and stays in
	/// `data`.
	pub fn from_history(state: Option<Value>) -> Self {
		match state {
			Some(Value::Object(data)) => Self {
				redirected_by: None,
				data,
			},
			_ => Self::default(),
		}
	}

	/// Structurally clonable copy for the native history.
	pub fn to_history(&self) -> Value {
		let mut data = self.data.clone();
		if let Some(route) = &self.redirected_by {
			data.insert(REDIRECTED_BY_KEY.to_string(), Value::String(route.url.clone()));
		}
		Value::Object(data)
	}
}

/// The route a router currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
	/// How it was reached.
	pub mode: RouteMode,
	/// Router-internal URL.
	pub url: String,
	/// Attached state.
	pub state: NavigationState,
}

impl ActiveRoute {
	/// Creates a route with an empty state.
	pub fn new(mode: RouteMode, url: impl Into<String>) -> Self {
		Self {
			mode,
			url: url.into(),
			state: NavigationState::default(),
		}
	}

	/// Replaces the state.
	pub fn with_state(mut self, state: NavigationState) -> Self {
		self.state = state;
		self
	}
}

/// Observable holder of a router's [`ActiveRoute`].
///
/// Subscribers run synchronously inside [`RouteStore::set`], after the new
/// value is visible through [`RouteStore::get`].
pub struct RouteStore {
	value: RefCell<Option<ActiveRoute>>,
	subscribers: Rc<HookChain<ActiveRoute>>,
}

impl RouteStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self {
			value: RefCell::new(None),
			subscribers: HookChain::new("active_route"),
		}
	}

	/// Returns the current route, if any.
	pub fn get(&self) -> Option<ActiveRoute> {
		self.value.borrow().clone()
	}

	/// Sets the route and notifies subscribers.
	pub fn set(&self, route: ActiveRoute) {
		*self.value.borrow_mut() = Some(route.clone());
		self.subscribers.run(&route);
	}

	/// Subscribes to route changes.
	pub fn subscribe<F>(&self, handler: F) -> HookRegistration
	where
		F: Fn(&ActiveRoute) + 'static,
	{
		self.subscribers.subscribe(move |route| {
			handler(route);
			HookFlow::Continue
		})
	}
}

impl Default for RouteStore {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for RouteStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteStore")
			.field("value", &self.value.borrow())
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_to_history_flattens_redirected_by() {
		// Arrange
		let login = ActiveRoute::new(RouteMode::Push, "/login")
			.with_state(NavigationState::new().with("attempt", json!(1)));
		let state = NavigationState::new()
			.with("from", json!("guard"))
			.with_redirected_by(login);

		// Act
		let persisted = state.to_history();

		// Assert
		assert_eq!(persisted, json!({"from": "guard", "redirectedBy": "/login"}));
		assert!(state.redirected_by.is_some());
	}

	#[rstest]
	fn test_from_history_keeps_object_fields() {
		let state = NavigationState::from_history(Some(json!({"redirectedBy": "/login", "n": 2})));

		assert!(state.redirected_by.is_none());
		assert_eq!(state.data.get("redirectedBy"), Some(&json!("/login")));
		assert_eq!(state.to_history(), json!({"redirectedBy": "/login", "n": 2}));
	}

	#[rstest]
	#[case(None)]
	#[case(Some(json!("scalar")))]
	#[case(Some(json!([1, 2])))]
	fn test_from_history_non_object_is_empty(#[case] raw: Option<Value>) {
		assert_eq!(NavigationState::from_history(raw), NavigationState::default());
	}

	#[rstest]
	fn test_route_mode_serde_names() {
		assert_eq!(serde_json::to_value(RouteMode::PopState).unwrap(), json!("popState"));
		assert_eq!(serde_json::to_value(RouteMode::Push).unwrap(), json!("push"));
		assert_eq!(
			serde_json::from_value::<RouteMode>(json!("replace")).unwrap(),
			RouteMode::Replace
		);
	}

	#[rstest]
	fn test_store_notifies_after_value_is_visible() {
		// Arrange
		let store = Rc::new(RouteStore::new());
		let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
		let (sink, observed) = (Rc::clone(&seen), Rc::downgrade(&store));
		let registration = store.subscribe(move |_| {
			let current = observed.upgrade().and_then(|s| s.get()).map(|r| r.url);
			sink.borrow_mut().push(current);
		});

		// Act
		store.set(ActiveRoute::new(RouteMode::Push, "/a"));
		registration.unregister();
		store.set(ActiveRoute::new(RouteMode::Replace, "/b"));

		// Assert
		assert_eq!(*seen.borrow(), vec![Some("/a".to_string())]);
		assert_eq!(store.get().map(|r| r.mode), Some(RouteMode::Replace));
	}
}
