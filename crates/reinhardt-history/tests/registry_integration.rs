//! Integration tests for the history hook registry
//!
//! These tests drive the registry the way a page does: foreign code calls the
//! public entry points of a hooked [`MemoryHistory`], handlers observe them,
//! and native writes go around the chains.

use reinhardt_history::{
	HistoryHookRegistry, HookFlow, HookKind, MemoryHistory, NativeHistory, StateChange,
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[fixture]
fn memory() -> Rc<MemoryHistory> {
	Rc::new(MemoryHistory::new("/"))
}

#[rstest]
fn test_double_install_yields_single_native_write_per_push(memory: Rc<MemoryHistory>) {
	// Arrange: the handler performs the real write, like a reflector does
	let first = HistoryHookRegistry::install(memory.clone());
	let second = HistoryHookRegistry::install(memory.clone());
	let writer = Rc::clone(&first);
	let _registration = second.on_pushstate(move |change: &StateChange| {
		writer
			.push_state_native(change.state.as_ref(), &change.title, &change.url)
			.unwrap();
		HookFlow::Continue
	});

	// Act
	memory.call_push_state(None, "", "/once").unwrap();

	// Assert
	assert_eq!(memory.native_write_count(), 1);
	assert_eq!(memory.location(), "/once");
	assert_eq!(first.subscriber_count(HookKind::PushState), 1);
}

#[rstest]
fn test_stop_hides_call_from_later_subscribers(memory: Rc<MemoryHistory>) {
	// Arrange
	let registry = HistoryHookRegistry::new(memory.clone());
	let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
	let (a, b) = (Rc::clone(&seen), Rc::clone(&seen));
	let _gate = registry.on_replacestate(move |change| {
		a.borrow_mut().push("gate");
		if change.state == Some(json!({"private": true})) {
			HookFlow::Stop
		} else {
			HookFlow::Continue
		}
	});
	let _observer = registry.on_replacestate(move |_| {
		b.borrow_mut().push("observer");
		HookFlow::Continue
	});

	// Act
	let stopped = registry.replace_state(Some(json!({"private": true})), "", "/x");
	let passed = registry.replace_state(None, "", "/y");

	// Assert
	assert_eq!(stopped, HookFlow::Stop);
	assert_eq!(passed, HookFlow::Continue);
	assert_eq!(*seen.borrow(), vec!["gate", "gate", "observer"]);
}

#[rstest]
fn test_unregistered_handlers_no_longer_observe(memory: Rc<MemoryHistory>) {
	// Arrange
	let registry = HistoryHookRegistry::new(memory.clone());
	let pops = Rc::new(RefCell::new(0));
	let counter = Rc::clone(&pops);
	let registration = registry.on_popstate(move |_| {
		*counter.borrow_mut() += 1;
		HookFlow::Continue
	});
	registry.push_state_native(None, "", "/a").unwrap();

	// Act
	memory.back();
	assert!(registration.unregister());
	memory.forward();

	// Assert
	assert_eq!(*pops.borrow(), 1);
	assert_eq!(registry.subscriber_count(HookKind::PopState), 0);
}
