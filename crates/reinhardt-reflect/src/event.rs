//! Navigation events and ownership tags.
//!
//! A router that writes to the browser history stamps its name into the
//! state object at `state.reinhardt.router`. When a hooked `pushState` /
//! `replaceState` call arrives, that tag tells each reflector whether the
//! event is unclaimed, its own, or another router's.

use reinhardt_history::{PopEvent, StateChange};
use serde_json::{Map, Value};

/// Key of the namespace object carrying the owner tag.
pub const OWNER_TAG_NAMESPACE: &str = "reinhardt";

/// Key of the router name inside [`OWNER_TAG_NAMESPACE`].
pub const OWNER_TAG_KEY: &str = "router";

/// Which native operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMethod {
	/// `pushState`.
	Push,
	/// `replaceState`.
	Replace,
	/// Back/forward traversal.
	Pop,
}

/// Owner tag carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Owner {
	/// Not claimed by any router: a direct native call or real browser
	/// navigation.
	#[default]
	Unclaimed,
	/// Tagged by the named router.
	Router(String),
}

impl Owner {
	/// Reads the owner tag from a history state object.
	///
	/// Anything other than a string at `reinhardt.router` reads as
	/// [`Owner::Unclaimed`].
	pub fn from_state(state: Option<&Value>) -> Self {
		state
			.and_then(|state| state.get(OWNER_TAG_NAMESPACE))
			.and_then(|namespace| namespace.get(OWNER_TAG_KEY))
			.and_then(Value::as_str)
			.map(|name| Self::Router(name.to_string()))
			.unwrap_or_default()
	}
}

/// An event's owner relative to one router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership<'a> {
	/// No router claimed the event.
	Unclaimed,
	/// The event carries this router's own tag.
	Own,
	/// The event belongs to the named router.
	Foreign(&'a str),
}

/// A navigation observed through the hook chains.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
	/// Operation that produced the event.
	pub method: NavigationMethod,
	/// Browser-side URL.
	pub url: String,
	/// History state.
	pub state: Option<Value>,
	/// Owner tag read from `state`.
	pub owner: Owner,
}

impl NavigationEvent {
	/// Builds an event from a hooked push/replace call.
	pub fn from_state_change(method: NavigationMethod, change: &StateChange) -> Self {
		Self {
			method,
			url: change.url.clone(),
			owner: Owner::from_state(change.state.as_ref()),
			state: change.state.clone(),
		}
	}

	/// Builds an event from a traversal, with the URL the browser now shows.
	pub fn from_pop(event: &PopEvent, url: impl Into<String>) -> Self {
		Self {
			method: NavigationMethod::Pop,
			url: url.into(),
			owner: Owner::from_state(event.state.as_ref()),
			state: event.state.clone(),
		}
	}

	/// Classifies the event relative to the router called `router_name`.
	pub fn ownership(&self, router_name: &str) -> Ownership<'_> {
		match &self.owner {
			Owner::Unclaimed => Ownership::Unclaimed,
			Owner::Router(name) if name == router_name => Ownership::Own,
			Owner::Router(name) => Ownership::Foreign(name),
		}
	}
}

/// Writes `router_name` as the owner tag of `state`.
///
/// A non-object state is replaced by an object holding only the tag.
pub fn stamp_owner(state: &mut Value, router_name: &str) {
	if !state.is_object() {
		*state = Value::Object(Map::new());
	}
	let Value::Object(map) = state else {
		return;
	};
	let namespace = map
		.entry(OWNER_TAG_NAMESPACE)
		.or_insert_with(|| Value::Object(Map::new()));
	if !namespace.is_object() {
		*namespace = Value::Object(Map::new());
	}
	if let Value::Object(namespace) = namespace {
		namespace.insert(OWNER_TAG_KEY.to_string(), Value::String(router_name.to_string()));
	}
}

/// Removes the owner tag from `state`, dropping the namespace object once it
/// is empty.
pub fn clear_owner(state: &mut Value) {
	let Value::Object(map) = state else {
		return;
	};
	let emptied = match map.get_mut(OWNER_TAG_NAMESPACE) {
		Some(Value::Object(namespace)) => {
			namespace.remove(OWNER_TAG_KEY);
			namespace.is_empty()
		}
		_ => false,
	};
	if emptied {
		map.remove(OWNER_TAG_NAMESPACE);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(None, Owner::Unclaimed)]
	#[case(Some(json!({})), Owner::Unclaimed)]
	#[case(Some(json!({"reinhardt": "main"})), Owner::Unclaimed)]
	#[case(Some(json!({"reinhardt": {"router": 42}})), Owner::Unclaimed)]
	#[case(Some(json!({"reinhardt": {"router": "main"}})), Owner::Router("main".to_string()))]
	fn test_owner_from_state(#[case] state: Option<Value>, #[case] expected: Owner) {
		assert_eq!(Owner::from_state(state.as_ref()), expected);
	}

	#[rstest]
	fn test_ownership_tri_state() {
		let change = StateChange::new(Some(json!({"reinhardt": {"router": "main"}})), "", "/x");
		let event = NavigationEvent::from_state_change(NavigationMethod::Push, &change);

		assert_eq!(event.ownership("main"), Ownership::Own);
		assert_eq!(event.ownership("sidebar"), Ownership::Foreign("main"));

		let untagged = NavigationEvent::from_state_change(
			NavigationMethod::Replace,
			&StateChange::new(None, "", "/y"),
		);
		assert_eq!(untagged.ownership("main"), Ownership::Unclaimed);
	}

	#[rstest]
	fn test_stamp_owner_keeps_existing_fields() {
		// Arrange
		let mut state = json!({"scroll": 120, "reinhardt": {"other": true}});

		// Act
		stamp_owner(&mut state, "main");

		// Assert
		assert_eq!(
			state,
			json!({"scroll": 120, "reinhardt": {"other": true, "router": "main"}})
		);
		assert_eq!(
			Owner::from_state(Some(&state)),
			Owner::Router("main".to_string())
		);
	}

	#[rstest]
	fn test_stamp_owner_on_non_object_state() {
		let mut state = Value::Null;
		stamp_owner(&mut state, "main");
		assert_eq!(state, json!({"reinhardt": {"router": "main"}}));
	}

	#[rstest]
	#[case(json!({"reinhardt": {"router": "a"}}), json!({}))]
	#[case(json!({"scroll": 40, "reinhardt": {"router": "a", "other": 1}}), json!({"scroll": 40, "reinhardt": {"other": 1}}))]
	#[case(json!({"reinhardt": "a"}), json!({"reinhardt": "a"}))]
	#[case(json!("plain"), json!("plain"))]
	fn test_clear_owner(#[case] state: Value, #[case] expected: Value) {
		// Arrange
		let mut state = state;

		// Act
		clear_owner(&mut state);

		// Assert
		assert_eq!(state, expected);
		assert_eq!(Owner::from_state(Some(&state)), Owner::Unclaimed);
	}

	#[rstest]
	fn test_pop_event_reads_tag() {
		let pop = PopEvent {
			state: Some(json!({"reinhardt": {"router": "a"}})),
		};
		let event = NavigationEvent::from_pop(&pop, "/back");
		assert_eq!(event.method, NavigationMethod::Pop);
		assert_eq!(event.owner, Owner::Router("a".to_string()));
		assert_eq!(event.url, "/back");
	}
}
