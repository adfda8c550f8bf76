//! The process-wide history hook registry.
//!
//! [`HistoryHookRegistry`] turns the native, non-observable history entry
//! points into three ordered hook chains:
//!
//! | Chain | Fed by |
//! |-------|--------|
//! | `on_pushstate` | public `pushState` calls |
//! | `on_replacestate` | public `replaceState` calls |
//! | `on_popstate` | back/forward traversal |
//!
//! The native writes stay reachable through
//! [`HistoryHookRegistry::push_state_native`] and
//! [`HistoryHookRegistry::replace_state_native`], which never touch the
//! chains. Reflectors write through those so their own writes are not
//! observed again as inbound navigation.
//!
//! The chain invocation *replaces* the native call: a hooked `pushState` only
//! fans out to the handlers. Whoever handles it (normally an address
//! reflector) performs the actual native write.
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_history::{HistoryHookRegistry, HookFlow, MemoryHistory};
//! use std::rc::Rc;
//!
//! let registry = HistoryHookRegistry::install(Rc::new(MemoryHistory::new("/")));
//! let registration = registry.on_pushstate(|change| {
//!     println!("navigating to {}", change.url);
//!     HookFlow::Continue
//! });
//! registry.push_state(None, "", "/about");
//! registration.unregister();
//! ```

use crate::error::HistoryError;
use crate::hooks::{HookChain, HookFlow, HookRegistration};
use crate::native::{NativeHistory, NativeHooks, PopEvent, StateChange};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

thread_local! {
	static INSTALLED: RefCell<Option<Rc<HistoryHookRegistry>>> = const { RefCell::new(None) };
}

/// Identifies one of the three hook chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
	/// `pushState` calls.
	PushState,
	/// `replaceState` calls.
	ReplaceState,
	/// Back/forward traversal.
	PopState,
}

/// Observable wrapper around a [`NativeHistory`].
pub struct HistoryHookRegistry {
	native: Rc<dyn NativeHistory>,
	on_pushstate: Rc<HookChain<StateChange>>,
	on_replacestate: Rc<HookChain<StateChange>>,
	on_popstate: Rc<HookChain<PopEvent>>,
}

impl HistoryHookRegistry {
	/// Installs the registry for this thread, or returns the installed one.
	///
	/// The second and later calls are no-ops that hand back the first
	/// registry; `native` is ignored in that case. Never fails: if the native
	/// object cannot be hooked the problem is logged and the registry still
	/// works through its own entry points.
	pub fn install(native: Rc<dyn NativeHistory>) -> Rc<Self> {
		if let Some(existing) = Self::current() {
			tracing::debug!("history hooks already installed");
			return existing;
		}

		let registry = Rc::new(Self::new(native));
		INSTALLED.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&registry)));
		registry
	}

	/// Returns the registry installed on this thread, if any.
	pub fn current() -> Option<Rc<Self>> {
		INSTALLED.with(|slot| slot.borrow().clone())
	}

	/// Builds a registry without installing it as the thread's singleton.
	///
	/// The native object is only wrapped if it does not already carry hooks.
	pub fn new(native: Rc<dyn NativeHistory>) -> Self {
		let registry = Self {
			native,
			on_pushstate: HookChain::new("on_pushstate"),
			on_replacestate: HookChain::new("on_replacestate"),
			on_popstate: HookChain::new("on_popstate"),
		};

		if registry.native.is_hooked() {
			tracing::debug!("native history already hooked, leaving entry points as they are");
		} else {
			tracing::debug!("polyfill history hooks");
			if let Err(err) = registry.native.hook(registry.native_hooks()) {
				tracing::warn!(
					error = %err,
					"native history could not be hooked; only registry entry points are observed"
				);
			}
		}
		registry
	}

	fn native_hooks(&self) -> NativeHooks {
		let push = Rc::clone(&self.on_pushstate);
		let replace = Rc::clone(&self.on_replacestate);
		let pop = Rc::clone(&self.on_popstate);
		NativeHooks {
			push_state: Rc::new(move |change| {
				push.run(&change);
			}),
			replace_state: Rc::new(move |change| {
				replace.run(&change);
			}),
			pop_state: Rc::new(move |event| {
				pop.run(&event);
			}),
		}
	}

	/// Subscribes to `pushState` calls.
	pub fn on_pushstate<F>(&self, handler: F) -> HookRegistration
	where
		F: Fn(&StateChange) -> HookFlow + 'static,
	{
		self.on_pushstate.subscribe(handler)
	}

	/// Subscribes to `replaceState` calls.
	pub fn on_replacestate<F>(&self, handler: F) -> HookRegistration
	where
		F: Fn(&StateChange) -> HookFlow + 'static,
	{
		self.on_replacestate.subscribe(handler)
	}

	/// Subscribes to back/forward traversal.
	pub fn on_popstate<F>(&self, handler: F) -> HookRegistration
	where
		F: Fn(&PopEvent) -> HookFlow + 'static,
	{
		self.on_popstate.subscribe(handler)
	}

	/// Number of handlers on the given chain.
	pub fn subscriber_count(&self, kind: HookKind) -> usize {
		match kind {
			HookKind::PushState => self.on_pushstate.len(),
			HookKind::ReplaceState => self.on_replacestate.len(),
			HookKind::PopState => self.on_popstate.len(),
		}
	}

	/// Hooked `pushState`: runs the push chain.
	pub fn push_state(&self, state: Option<Value>, title: &str, url: &str) -> HookFlow {
		self.on_pushstate.run(&StateChange::new(state, title, url))
	}

	/// Hooked `replaceState`: runs the replace chain.
	pub fn replace_state(&self, state: Option<Value>, title: &str, url: &str) -> HookFlow {
		self.on_replacestate.run(&StateChange::new(state, title, url))
	}

	/// Runs the pop chain as the `popstate` listener would.
	pub fn dispatch_popstate(&self, event: PopEvent) -> HookFlow {
		self.on_popstate.run(&event)
	}

	/// Native `pushState`, bypassing every chain.
	pub fn push_state_native(
		&self,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		self.native.push_state(state, title, url)
	}

	/// Native `replaceState`, bypassing every chain.
	pub fn replace_state_native(
		&self,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		self.native.replace_state(state, title, url)
	}

	/// Current composite browser URL.
	pub fn location(&self) -> String {
		self.native.location()
	}

	/// The wrapped native backend.
	pub fn native(&self) -> &Rc<dyn NativeHistory> {
		&self.native
	}
}

impl fmt::Debug for HistoryHookRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HistoryHookRegistry")
			.field("on_pushstate", &self.on_pushstate)
			.field("on_replacestate", &self.on_replacestate)
			.field("on_popstate", &self.on_popstate)
			.finish()
	}
}
