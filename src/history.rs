//! Observable session history
//!
//! Hook chains for `pushState`, `replaceState` and `popstate`, shared by every
//! reflector on the page. On WASM the registry wraps `window.history`
//! through `BrowserHistory`; elsewhere [`MemoryHistory`] stands in for it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use reinhardt_navigation::history::{HistoryHookRegistry, HookFlow, MemoryHistory};
//! use std::rc::Rc;
//!
//! let registry = HistoryHookRegistry::install(Rc::new(MemoryHistory::new("/")));
//! let _logger = registry.on_popstate(|event| {
//!     tracing::info!(state = ?event.state, "traversed");
//!     HookFlow::Continue
//! });
//! ```

pub use reinhardt_history::*;
