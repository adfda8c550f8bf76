//! Address-bar reflection for a single router.
//!
//! An [`AddressReflector`] sits between a [`Router`] and the shared
//! [`HistoryHookRegistry`](reinhardt_history::HistoryHookRegistry):
//!
//! - **Inbound**: hooked `pushState` / `replaceState` calls and `popstate`
//!   traversals are translated into the router's URL space and applied with
//!   the matching mode.
//! - **Outbound**: every push or replace of the router's active route is
//!   written to the native history as the composite URL of all
//!   address-reflecting routers. These writes bypass the hook chains, so no
//!   reflector observes them again.
//!
//! Events tagged by another router are not applied and hide the call from
//! reflectors later in the chain. Events carrying this router's own tag are
//! ignored without stopping the chain.

use crate::context::NavigationContext;
use crate::error::ReflectError;
use crate::event::{NavigationEvent, NavigationMethod, Ownership, clear_owner, stamp_owner};
use crate::route::{NavigationState, RouteMode};
use crate::router::Router;
use reinhardt_history::{HookFlow, HookRegistration, PopEvent, StateChange};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Keeps one router and the browser address bar in sync.
///
/// Created through [`Router::enable_address_reflection`] (or a router
/// builder with address reflection on); at most one per router.
pub struct AddressReflector {
	router: Weak<Router>,
	context: Rc<NavigationContext>,
	hooks: RefCell<Vec<HookRegistration>>,
}

impl AddressReflector {
	pub(crate) fn new(router: &Rc<Router>) -> Self {
		Self {
			router: Rc::downgrade(router),
			context: Rc::clone(router.context()),
			hooks: RefCell::new(Vec::new()),
		}
	}

	/// Subscribes to the three hook chains, joins the address-router set and
	/// seeds either side from the other.
	///
	/// A router without an active route absorbs the current browser URL with
	/// a replace. A router that was already driven reflects its route out.
	/// Installing an installed reflector does nothing.
	pub fn install(&self) -> Result<(), ReflectError> {
		if self.is_installed() {
			return Ok(());
		}
		let router = self.router.upgrade().ok_or(ReflectError::RouterDropped)?;
		let history = self.context.history();

		let registrations = vec![
			history.on_pushstate(state_change_handler(&self.router, NavigationMethod::Push)),
			history.on_replacestate(state_change_handler(&self.router, NavigationMethod::Replace)),
			history.on_popstate(pop_handler(&self.router)),
		];
		*self.hooks.borrow_mut() = registrations;
		self.context.register_address_router(&router);
		tracing::debug!(router = router.name(), "address reflector installed");

		if router.active_route().is_none() {
			self.absorb(&router)
		} else {
			self.reflect().map(|_| ())
		}
	}

	/// Unsubscribes from the hook chains and leaves the address-router set.
	///
	/// When other address routers remain, the address bar is rewritten on the
	/// next tick without this router's contribution.
	pub fn uninstall(&self) {
		match self.router.upgrade() {
			Some(router) => self.detach(&router),
			None => {
				self.release_hooks();
			}
		}
	}

	/// Whether the reflector is subscribed to the hook chains.
	pub fn is_installed(&self) -> bool {
		!self.hooks.borrow().is_empty()
	}

	/// The router this reflector serves, if it is still alive.
	pub fn router(&self) -> Option<Rc<Router>> {
		self.router.upgrade()
	}

	/// Writes the router's active route to the address bar.
	///
	/// Returns whether a native write happened. Routes reached through
	/// `popstate` are never written back; the browser already shows them.
	pub fn reflect(&self) -> Result<bool, ReflectError> {
		self.reflect_batch(false)
	}

	/// Like [`AddressReflector::reflect`], but writes a push when `pushed`
	/// unless the final route came from `popstate`.
	pub(crate) fn reflect_batch(&self, pushed: bool) -> Result<bool, ReflectError> {
		if !self.is_installed() {
			return Ok(false);
		}
		let Some(router) = self.router.upgrade() else {
			return Ok(false);
		};
		let Some(route) = router.active_route() else {
			return Ok(false);
		};
		let mode = match route.mode {
			RouteMode::Replace if pushed => RouteMode::Push,
			mode => mode,
		};
		let owner = self.context.config().stamp_owner.then(|| router.name());
		write_route(&self.context, owner, &route.state, mode)
	}

	fn absorb(&self, router: &Router) -> Result<(), ReflectError> {
		let url = self.context.url_from_browser(router);
		tracing::debug!(router = router.name(), url = %url, "absorbing browser url");
		router.replace_url(&url)
	}

	/// Releases the hooks and schedules the resync for `router`.
	///
	/// Takes the router by reference so it also works from the router's
	/// `Drop`, when it can no longer be upgraded. The deferred task holds the
	/// context weakly and does nothing once the context is gone.
	pub(crate) fn detach(&self, router: &Router) {
		if !self.release_hooks() {
			return;
		}
		self.context.unregister_address_router(router);
		tracing::debug!(router = router.name(), "address reflector uninstalled");

		if !self.context.config().resync_on_uninstall {
			return;
		}
		let Some(last) = router.active_route() else {
			return;
		};
		let context = Rc::downgrade(&self.context);
		self.context.scheduler().defer(Box::new(move || {
			let Some(context) = context.upgrade() else {
				return;
			};
			if context.address_routers().is_empty() {
				return;
			}
			if let Err(err) = write_route(&context, None, &last.state, RouteMode::Replace) {
				tracing::error!(error = %err, "address resync after uninstall failed");
			}
		}));
	}

	fn release_hooks(&self) -> bool {
		let hooks = std::mem::take(&mut *self.hooks.borrow_mut());
		let released = !hooks.is_empty();
		for registration in hooks {
			registration.unregister();
		}
		released
	}
}

impl fmt::Debug for AddressReflector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AddressReflector")
			.field("router", &self.router.upgrade().map(|r| r.name().to_string()))
			.field("installed", &self.is_installed())
			.finish()
	}
}

fn state_change_handler(
	router: &Weak<Router>,
	method: NavigationMethod,
) -> impl Fn(&StateChange) -> HookFlow + 'static {
	let router = router.clone();
	move |change| {
		let Some(router) = router.upgrade() else {
			return HookFlow::Continue;
		};
		let event = NavigationEvent::from_state_change(method, change);
		match event.ownership(router.name()) {
			Ownership::Foreign(owner) => {
				tracing::trace!(router = router.name(), owner, "ignoring foreign navigation");
				HookFlow::Stop
			}
			Ownership::Own => HookFlow::Continue,
			Ownership::Unclaimed => {
				let context = router.context();
				let url = router.rewrite_to_internal(context.adapter().to_router(&event.url, &router));
				let applied = match method {
					NavigationMethod::Replace => router.replace_url(&url),
					_ => router.push_url(&url),
				};
				if let Err(err) = applied {
					tracing::error!(
						router = router.name(),
						url = %url,
						error = %err,
						"inbound navigation failed"
					);
				}
				HookFlow::Continue
			}
		}
	}
}

fn pop_handler(router: &Weak<Router>) -> impl Fn(&PopEvent) -> HookFlow + 'static {
	let router = router.clone();
	move |pop| {
		let Some(router) = router.upgrade() else {
			return HookFlow::Continue;
		};
		// Every address router applies traversals, whatever their tag says
		let event = NavigationEvent::from_pop(pop, router.context().url_from_browser(&router));
		tracing::trace!(router = router.name(), owner = ?event.owner, "applying popstate");
		if let Err(err) = router.pop_url(&event.url, event.state) {
			tracing::error!(
				router = router.name(),
				url = %event.url,
				error = %err,
				"popstate failed"
			);
		}
		HookFlow::Continue
	}
}

/// Writes the composite URL with `state` to the native history. Any owner tag
/// carried in `state` is dropped and replaced by `owner`, if given.
fn write_route(
	context: &NavigationContext,
	owner: Option<&str>,
	state: &NavigationState,
	mode: RouteMode,
) -> Result<bool, ReflectError> {
	if mode == RouteMode::PopState {
		tracing::debug!(owner, "route came from popstate, not reflecting");
		return Ok(false);
	}
	let url = context.compose_browser_url();
	let mut state = state.to_history();
	clear_owner(&mut state);
	if let Some(owner) = owner {
		stamp_owner(&mut state, owner);
	}
	tracing::debug!(url = %url, ?mode, owner, "reflecting route");

	let history = context.history();
	match mode {
		RouteMode::Push => history.push_state_native(Some(&state), "", &url)?,
		_ => history.replace_state_native(Some(&state), "", &url)?,
	}
	Ok(true)
}

/// Makes a composite URL acceptable to `pushState`: anything not starting
/// with `/` or `#` gets a leading `/`.
pub fn normalize_browser_url(url: &str) -> String {
	if url.starts_with('/') || url.starts_with('#') {
		url.to_string()
	} else {
		format!("/{url}")
	}
}
