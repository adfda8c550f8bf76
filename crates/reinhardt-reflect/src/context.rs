//! Shared state of every router attached to one browser history.

use crate::adapter::BrowserAdapter;
use crate::config::ReflectorConfig;
use crate::reflector::normalize_browser_url;
use crate::router::Router;
use crate::scheduler::{Scheduler, TickQueue};
use reinhardt_history::HistoryHookRegistry;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Everything routers on one page share: the hook registry, the browser
/// adapter, the scheduler, the reflector settings, and the set of routers
/// that reflect into the address bar.
pub struct NavigationContext {
	history: Rc<HistoryHookRegistry>,
	adapter: Rc<dyn BrowserAdapter>,
	scheduler: Rc<dyn Scheduler>,
	/// Backs the default scheduler off WASM.
	tick_queue: Option<Rc<TickQueue>>,
	config: ReflectorConfig,
	address_routers: RefCell<Vec<Weak<Router>>>,
}

impl NavigationContext {
	/// Creates a context with the default scheduler and settings.
	///
	/// The default scheduler is `setTimeout(0)` on WASM. Elsewhere it is a
	/// [`TickQueue`] reachable through [`NavigationContext::tick_queue`],
	/// which the host drains to run deferred work.
	pub fn new(history: Rc<HistoryHookRegistry>, adapter: Rc<dyn BrowserAdapter>) -> Self {
		let (scheduler, tick_queue) = default_scheduler();
		Self {
			history,
			adapter,
			scheduler,
			tick_queue,
			config: ReflectorConfig::default(),
			address_routers: RefCell::new(Vec::new()),
		}
	}

	/// Replaces the scheduler.
	pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
		self.scheduler = scheduler;
		self.tick_queue = None;
		self
	}

	/// Replaces the settings.
	pub fn with_config(mut self, config: ReflectorConfig) -> Self {
		self.config = config;
		self
	}

	/// The shared hook registry.
	pub fn history(&self) -> &Rc<HistoryHookRegistry> {
		&self.history
	}

	/// The browser adapter.
	pub fn adapter(&self) -> &Rc<dyn BrowserAdapter> {
		&self.adapter
	}

	/// The scheduler used for deferred work.
	pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
		&self.scheduler
	}

	/// The queue behind the default native scheduler.
	///
	/// `None` on WASM and after [`NavigationContext::with_scheduler`].
	pub fn tick_queue(&self) -> Option<&Rc<TickQueue>> {
		self.tick_queue.as_ref()
	}

	/// The reflector settings.
	pub fn config(&self) -> &ReflectorConfig {
		&self.config
	}

	/// Routers currently reflecting into the address bar, in registration
	/// order.
	pub fn address_routers(&self) -> Vec<Rc<Router>> {
		let mut routers = self.address_routers.borrow_mut();
		routers.retain(|router| router.strong_count() > 0);
		routers.iter().filter_map(Weak::upgrade).collect()
	}

	pub(crate) fn register_address_router(&self, router: &Rc<Router>) {
		let mut routers = self.address_routers.borrow_mut();
		if !routers.iter().any(|known| Weak::as_ptr(known) == Rc::as_ptr(router)) {
			routers.push(Rc::downgrade(router));
		}
	}

	pub(crate) fn unregister_address_router(&self, router: &Router) {
		let target: *const Router = router;
		self.address_routers
			.borrow_mut()
			.retain(|known| Weak::as_ptr(known) != target && known.strong_count() > 0);
	}

	/// `router`'s internal URL for what the browser currently shows: the
	/// adapter's split followed by the router's rewrites.
	pub fn url_from_browser(&self, router: &Router) -> String {
		let url = self.adapter.to_router(&self.history.location(), router);
		router.rewrite_to_internal(url)
	}

	/// Composite browser URL of all address routers, normalized.
	pub fn compose_browser_url(&self) -> String {
		let routers = self.address_routers();
		let url = self
			.adapter
			.to_browser(&routers)
			.filter(|url| !url.is_empty())
			.unwrap_or_else(|| self.config.fallback_url.clone());
		normalize_browser_url(&url)
	}
}

impl fmt::Debug for NavigationContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationContext")
			.field("history", &self.history)
			.field("config", &self.config)
			.field("address_routers", &self.address_routers.borrow().len())
			.finish()
	}
}

#[cfg(target_arch = "wasm32")]
fn default_scheduler() -> (Rc<dyn Scheduler>, Option<Rc<TickQueue>>) {
	(Rc::new(crate::scheduler::TimeoutScheduler), None)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_scheduler() -> (Rc<dyn Scheduler>, Option<Rc<TickQueue>>) {
	let queue = Rc::new(TickQueue::new());
	let scheduler: Rc<dyn Scheduler> = queue.clone();
	(scheduler, Some(queue))
}
