//! Reinhardt Reflect - address-bar reflection for client routers
//!
//! Keeps the internal state of one or more routers and the browser address
//! bar consistent when they share a single session history.
//!
//! ## Flow
//!
//! ```text
//! pushState / replaceState / popstate
//!     -> HistoryHookRegistry chains
//!     -> AddressReflector (ownership filter)
//!     -> BrowserAdapter::to_router + UrlRewrite::to_internal
//!     -> Router::{push_url, replace_url, pop_url}
//!
//! Router::{push_url, replace_url, redirect_url}
//!     -> active route store
//!     -> AddressReflector::reflect
//!     -> BrowserAdapter::to_browser (all address routers)
//!     -> native pushState / replaceState (unhooked)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_history::{HistoryHookRegistry, MemoryHistory};
//! use reinhardt_reflect::{NavigationContext, PassthroughAdapter, Router};
//! use std::rc::Rc;
//!
//! let history = HistoryHookRegistry::install(Rc::new(MemoryHistory::new("/")));
//! let context = Rc::new(NavigationContext::new(history, Rc::new(PassthroughAdapter)));
//! let router = Router::builder("main").build(&context)?;
//! router.push_url("/users/42")?;
//! ```

pub mod adapter;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod reflector;
pub mod route;
pub mod router;
pub mod scheduler;

pub use adapter::{BrowserAdapter, PassthroughAdapter, UrlRewrite};
pub use config::ReflectorConfig;
pub use context::NavigationContext;
pub use error::ReflectError;
pub use event::{NavigationEvent, NavigationMethod, Owner, Ownership, clear_owner, stamp_owner};
pub use reflector::{AddressReflector, normalize_browser_url};
pub use route::{ActiveRoute, NavigationState, RouteMode, RouteStore};
pub use router::{Router, RouterBuilder};
#[cfg(target_arch = "wasm32")]
pub use scheduler::TimeoutScheduler;
pub use scheduler::{Scheduler, Task, TickQueue};
