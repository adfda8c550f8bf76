//! End-to-end navigation through the facade crate

#![cfg(feature = "reflect")]

use reinhardt_navigation::history::NativeHistory;
use reinhardt_navigation::reflect::{PassthroughAdapter, RouteMode};
use reinhardt_navigation::{HistoryHookRegistry, MemoryHistory, NavigationContext, Router};
use rstest::rstest;
use std::rc::Rc;

#[rstest]
fn test_back_forward_then_push_truncates() {
	// Arrange
	let memory = Rc::new(MemoryHistory::new("/"));
	let history = Rc::new(HistoryHookRegistry::new(memory.clone()));
	let context = Rc::new(NavigationContext::new(history, Rc::new(PassthroughAdapter)));
	let router = Router::builder("main").build(&context).unwrap();
	router.push_url("/a").unwrap();
	router.push_url("/b").unwrap();

	// Act & Assert: traversal is absorbed, never written back
	assert!(memory.back());
	assert_eq!(router.internal_url().as_deref(), Some("/a"));
	assert!(memory.forward());
	let route = router.active_route().unwrap();
	assert_eq!((route.url.as_str(), route.mode), ("/b", RouteMode::PopState));
	assert_eq!(memory.native_write_count(), 3);

	// Act & Assert: a push after going back drops the forward entry
	memory.back();
	router.push_url("/c").unwrap();
	let urls: Vec<String> = memory.entries().into_iter().map(|entry| entry.url).collect();
	assert_eq!(urls, vec!["/", "/a", "/c"]);
	assert_eq!(memory.location(), "/c");
}
