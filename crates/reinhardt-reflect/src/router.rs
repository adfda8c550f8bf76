//! The router side of address reflection.
//!
//! [`Router`] owns the active-route store and the `push` / `replace` / `pop`
//! entry points reflectors write into. It does not match routes: it records
//! the internal URL and mode it was driven to, notifies subscribers, and
//! reflects the result into the browser when it carries an
//! [`AddressReflector`].

use crate::adapter::UrlRewrite;
use crate::context::NavigationContext;
use crate::error::ReflectError;
use crate::reflector::AddressReflector;
use crate::route::{ActiveRoute, NavigationState, RouteMode, RouteStore};
use reinhardt_history::HookRegistration;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Builder for [`Router`].
pub struct RouterBuilder {
	name: String,
	url_rewrites: Vec<Rc<dyn UrlRewrite>>,
	address_reflection: bool,
}

impl RouterBuilder {
	/// Appends a URL rewrite. Rewrites apply in the order they were added.
	pub fn url_rewrite<R>(mut self, rewrite: R) -> Self
	where
		R: UrlRewrite + 'static,
	{
		self.url_rewrites.push(Rc::new(rewrite));
		self
	}

	/// Whether the router reflects into the address bar (default `true`).
	pub fn address_reflection(mut self, enabled: bool) -> Self {
		self.address_reflection = enabled;
		self
	}

	/// Builds the router and, unless disabled, installs its reflector.
	pub fn build(self, context: &Rc<NavigationContext>) -> Result<Rc<Router>, ReflectError> {
		let router = Rc::new(Router {
			name: self.name,
			context: Rc::clone(context),
			active_route: RouteStore::new(),
			url_rewrites: self.url_rewrites,
			url_reflector: RefCell::new(None),
			depth: Cell::new(0),
			batch_pushed: Cell::new(false),
		});
		if self.address_reflection {
			router.enable_address_reflection()?;
		}
		Ok(router)
	}
}

impl fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("name", &self.name)
			.field("url_rewrites", &self.url_rewrites.len())
			.field("address_reflection", &self.address_reflection)
			.finish()
	}
}

/// A named router attached to a [`NavigationContext`].
pub struct Router {
	name: String,
	context: Rc<NavigationContext>,
	active_route: RouteStore,
	url_rewrites: Vec<Rc<dyn UrlRewrite>>,
	url_reflector: RefCell<Option<Rc<AddressReflector>>>,
	/// Navigations in progress; nested ones come from route subscribers.
	depth: Cell<u32>,
	/// Whether the outermost navigation or one nested in it was a push.
	batch_pushed: Cell<bool>,
}

impl Router {
	/// Starts building a router called `name`.
	pub fn builder(name: impl Into<String>) -> RouterBuilder {
		RouterBuilder {
			name: name.into(),
			url_rewrites: Vec::new(),
			address_reflection: true,
		}
	}

	/// The router's name, used as its ownership tag.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The context this router is attached to.
	pub fn context(&self) -> &Rc<NavigationContext> {
		&self.context
	}

	/// The current route, `None` before the first navigation.
	pub fn active_route(&self) -> Option<ActiveRoute> {
		self.active_route.get()
	}

	/// Subscribes to active-route changes.
	pub fn subscribe<F>(&self, handler: F) -> HookRegistration
	where
		F: Fn(&ActiveRoute) + 'static,
	{
		self.active_route.subscribe(handler)
	}

	/// The URL rewrites, in application order.
	pub fn url_rewrites(&self) -> &[Rc<dyn UrlRewrite>] {
		&self.url_rewrites
	}

	/// Applies every rewrite's `to_internal`, first to last.
	pub fn rewrite_to_internal(&self, url: String) -> String {
		self.url_rewrites
			.iter()
			.fold(url, |url, rewrite| rewrite.to_internal(&url, self))
	}

	/// Current internal URL (debugging aid).
	pub fn internal_url(&self) -> Option<String> {
		self.active_route().map(|route| route.url)
	}

	/// The installed address reflector, if any.
	pub fn url_reflector(&self) -> Option<Rc<AddressReflector>> {
		self.url_reflector.borrow().clone()
	}

	/// Whether this router has an installed address reflector.
	pub fn reflects_address(&self) -> bool {
		self.url_reflector
			.borrow()
			.as_ref()
			.is_some_and(|reflector| reflector.is_installed())
	}

	/// Navigates to `url` with a new history entry.
	pub fn push_url(&self, url: &str) -> Result<(), ReflectError> {
		self.navigate(ActiveRoute::new(RouteMode::Push, url))
	}

	/// Navigates to `url`, replacing the current history entry.
	pub fn replace_url(&self, url: &str) -> Result<(), ReflectError> {
		self.navigate(ActiveRoute::new(RouteMode::Replace, url))
	}

	/// Applies a back/forward traversal to `url` with the entry's state.
	pub fn pop_url(&self, url: &str, state: Option<Value>) -> Result<(), ReflectError> {
		self.navigate(
			ActiveRoute::new(RouteMode::PopState, url).with_state(NavigationState::from_history(state)),
		)
	}

	/// Replaces the current route with `url`, remembering the current route
	/// as the one that redirected.
	pub fn redirect_url(&self, url: &str) -> Result<(), ReflectError> {
		let mut state = NavigationState::new();
		if let Some(current) = self.active_route() {
			state = state.with_redirected_by(current);
		}
		self.navigate(ActiveRoute::new(RouteMode::Replace, url).with_state(state))
	}

	/// Installs an [`AddressReflector`] on this router.
	///
	/// Fails with [`ReflectError::DuplicateReflector`] if one is already
	/// installed. An uninstalled reflector is replaced. If the initial
	/// absorb or reflect fails, the reflector is uninstalled again and the
	/// router is left without one.
	pub fn enable_address_reflection(self: &Rc<Self>) -> Result<Rc<AddressReflector>, ReflectError> {
		if self.reflects_address() {
			return Err(ReflectError::DuplicateReflector(self.name.clone()));
		}
		let reflector = Rc::new(AddressReflector::new(self));
		*self.url_reflector.borrow_mut() = Some(Rc::clone(&reflector));
		if let Err(err) = reflector.install() {
			self.url_reflector.borrow_mut().take();
			reflector.detach(self);
			return Err(err);
		}
		Ok(reflector)
	}

	/// Tears the router down: uninstalls its reflector, if any.
	///
	/// Calling it again is a no-op. Dropping the router does the same.
	pub fn destroy(&self) {
		let reflector = self.url_reflector.borrow_mut().take();
		if let Some(reflector) = reflector {
			reflector.detach(self);
		}
	}

	/// Sets the route and reflects it.
	///
	/// Navigations started by route subscribers only update the store. The
	/// outermost call writes the final route once, as a push if any
	/// navigation in the batch was one.
	fn navigate(&self, route: ActiveRoute) -> Result<(), ReflectError> {
		let depth = self.depth.get();
		if route.mode == RouteMode::Push {
			self.batch_pushed.set(true);
		}
		self.depth.set(depth + 1);
		self.active_route.set(route);
		self.depth.set(depth);
		if depth > 0 {
			return Ok(());
		}

		let pushed = self.batch_pushed.replace(false);
		let reflector = self.url_reflector();
		if let Some(reflector) = reflector {
			reflector.reflect_batch(pushed)?;
		}
		Ok(())
	}
}

impl Drop for Router {
	fn drop(&mut self) {
		self.destroy();
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("name", &self.name)
			.field("active_route", &self.active_route())
			.field("url_rewrites", &self.url_rewrites.len())
			.field("reflects_address", &self.reflects_address())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::PassthroughAdapter;
	use reinhardt_history::{
		HistoryError, HistoryHookRegistry, HookKind, MemoryHistory, NativeHistory, NativeHooks,
	};
	use rstest::{fixture, rstest};

	/// History whose native writes always fail.
	struct RejectingHistory;

	impl NativeHistory for RejectingHistory {
		fn push_state(&self, _: Option<&Value>, _: &str, _: &str) -> Result<(), HistoryError> {
			Err(HistoryError::NativeCall("QuotaExceededError".to_string()))
		}

		fn replace_state(&self, _: Option<&Value>, _: &str, _: &str) -> Result<(), HistoryError> {
			Err(HistoryError::NativeCall("QuotaExceededError".to_string()))
		}

		fn location(&self) -> String {
			"/".to_string()
		}

		fn is_hooked(&self) -> bool {
			false
		}

		fn hook(&self, _: NativeHooks) -> Result<(), HistoryError> {
			Ok(())
		}
	}

	struct Prefix(&'static str);

	impl UrlRewrite for Prefix {
		fn to_internal(&self, url: &str, _router: &Router) -> String {
			format!("{}{url}", self.0)
		}
	}

	#[fixture]
	fn context() -> Rc<NavigationContext> {
		let history = Rc::new(HistoryHookRegistry::new(Rc::new(MemoryHistory::new("/"))));
		Rc::new(NavigationContext::new(history, Rc::new(PassthroughAdapter)))
	}

	#[rstest]
	fn test_rewrites_fold_in_order(context: Rc<NavigationContext>) {
		let router = Router::builder("main")
			.url_rewrite(Prefix("/a"))
			.url_rewrite(Prefix("/b"))
			.address_reflection(false)
			.build(&context)
			.unwrap();

		assert_eq!(router.rewrite_to_internal("/x".to_string()), "/b/a/x");
		assert_eq!(router.url_rewrites().len(), 2);
	}

	#[rstest]
	fn test_redirect_without_current_route(context: Rc<NavigationContext>) {
		// Arrange
		let router = Router::builder("main")
			.address_reflection(false)
			.build(&context)
			.unwrap();

		// Act
		router.redirect_url("/login").unwrap();

		// Assert
		let route = router.active_route().unwrap();
		assert_eq!(route.mode, RouteMode::Replace);
		assert!(route.state.redirected_by.is_none());
	}

	#[rstest]
	fn test_subscribers_see_every_navigation(context: Rc<NavigationContext>) {
		// Arrange
		let router = Router::builder("main")
			.address_reflection(false)
			.build(&context)
			.unwrap();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let _registration = router.subscribe(move |route| sink.borrow_mut().push(route.mode));

		// Act
		router.push_url("/a").unwrap();
		router.replace_url("/b").unwrap();
		router.pop_url("/a", None).unwrap();

		// Assert
		assert_eq!(
			*seen.borrow(),
			vec![RouteMode::Push, RouteMode::Replace, RouteMode::PopState]
		);
	}

	#[rstest]
	fn test_reenabling_after_uninstall(context: Rc<NavigationContext>) {
		// Arrange
		let router = Router::builder("main").build(&context).unwrap();
		router.url_reflector().unwrap().uninstall();
		assert!(!router.reflects_address());

		// Act
		let reflector = router.enable_address_reflection().unwrap();

		// Assert
		assert!(reflector.is_installed());
		assert!(router.reflects_address());
		assert_eq!(context.address_routers().len(), 1);
	}

	#[rstest]
	fn test_failed_install_leaves_router_without_reflector() {
		// Arrange
		let history = Rc::new(HistoryHookRegistry::new(Rc::new(RejectingHistory)));
		let context = Rc::new(NavigationContext::new(
			Rc::clone(&history),
			Rc::new(PassthroughAdapter),
		));
		let router = Router::builder("main")
			.address_reflection(false)
			.build(&context)
			.unwrap();
		router.push_url("/driven").unwrap();

		// Act
		let result = router.enable_address_reflection();

		// Assert
		assert!(matches!(
			result,
			Err(ReflectError::History(HistoryError::NativeCall(_)))
		));
		assert!(router.url_reflector().is_none());
		assert!(!router.reflects_address());
		assert!(context.address_routers().is_empty());
		for kind in [HookKind::PushState, HookKind::ReplaceState, HookKind::PopState] {
			assert_eq!(history.subscriber_count(kind), 0);
		}
	}

	#[rstest]
	fn test_failed_build_reports_history_error() {
		let history = Rc::new(HistoryHookRegistry::new(Rc::new(RejectingHistory)));
		let context = Rc::new(NavigationContext::new(
			Rc::clone(&history),
			Rc::new(PassthroughAdapter),
		));

		let result = Router::builder("main").build(&context);

		assert!(matches!(result, Err(ReflectError::History(_))));
		assert!(context.address_routers().is_empty());
		assert_eq!(history.subscriber_count(HookKind::PushState), 0);
	}
}
