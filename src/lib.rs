//! # Reinhardt Navigation
//!
//! Browser history synchronization for client routers.
//!
//! One or more routers share a single browser history. Each router that opts
//! into address reflection keeps its slice of the composite address-bar URL in
//! sync with its own active route, in both directions, without reacting to
//! writes it or another router made.
//!
//! ## Feature Flags
//!
//! - `reflect` (default) - address reflectors and the router contract
//! - `bundler` - build-time grouping of route components into chunk files
//! - `full` - everything
//!
//! ## Crates
//!
//! - [`history`] - observable hook chains over the session-history API
//! - `reflect` - routers, reflectors, browser adapters
//! - `bundler` - route component bundles (not available on WASM)

pub mod history;
#[cfg(feature = "reflect")]
pub mod reflect;
#[cfg(all(feature = "bundler", not(target_arch = "wasm32")))]
pub mod bundler;

pub use reinhardt_history::{HistoryHookRegistry, HookFlow, HookRegistration, MemoryHistory};
#[cfg(feature = "reflect")]
pub use reinhardt_reflect::{
	AddressReflector, BrowserAdapter, NavigationContext, ReflectError, ReflectorConfig, Router,
	UrlRewrite,
};
