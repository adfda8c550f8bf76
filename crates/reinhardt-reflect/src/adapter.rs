//! Translation between browser URLs and router-internal URLs.
//!
//! Both traits are implemented by the application (or a routing layer on top
//! of this crate). Reflectors only call them.

use crate::router::Router;
use std::rc::Rc;

/// Splits the composite browser URL into per-router URLs and back.
pub trait BrowserAdapter {
	/// Extracts `router`'s internal URL from the composite browser URL.
	fn to_router(&self, browser_url: &str, router: &Router) -> String;

	/// Composes the browser URL from every address-reflecting router.
	///
	/// `None` or an empty string means "nothing to show"; the reflector then
	/// falls back to [`ReflectorConfig::fallback_url`](crate::ReflectorConfig).
	fn to_browser(&self, routers: &[Rc<Router>]) -> Option<String>;
}

/// A URL rewrite applied on the way into a router (and out of it).
pub trait UrlRewrite {
	/// Maps an external URL to the router's internal URL space.
	fn to_internal(&self, url: &str, router: &Router) -> String;

	/// Maps an internal URL back to its external form.
	fn to_external(&self, url: &str, _router: &Router) -> String {
		url.to_string()
	}
}

/// Adapter for a page driven by a single router: the browser URL *is* the
/// router URL.
///
/// With several address routers only the first one is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughAdapter;

impl BrowserAdapter for PassthroughAdapter {
	fn to_router(&self, browser_url: &str, _router: &Router) -> String {
		browser_url.to_string()
	}

	fn to_browser(&self, routers: &[Rc<Router>]) -> Option<String> {
		let router = routers.first()?;
		let url = router.internal_url()?;
		Some(
			router
				.url_rewrites()
				.iter()
				.rev()
				.fold(url, |url, rewrite| rewrite.to_external(&url, router)),
		)
	}
}
