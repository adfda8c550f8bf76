//! Reinhardt History - observable session history
//!
//! Browsers expose `history.pushState` / `history.replaceState` as plain
//! functions with no way to observe calls to them, and back/forward traversal
//! as a single `popstate` event. This crate wraps both into ordered,
//! multi-subscriber hook chains so that several routers can share one
//! browser history.
//!
//! ## Modules
//!
//! - [`hooks`]: generic ordered hook chains with unregister handles
//! - [`registry`]: the per-thread [`HistoryHookRegistry`]
//! - [`native`]: the [`NativeHistory`] backend trait
//! - [`memory`]: in-process [`MemoryHistory`] backend
//! - `browser` (WASM only): `window.history` backend

pub mod error;
pub mod hooks;
pub mod memory;
pub mod native;
pub mod registry;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
pub use error::HistoryError;
pub use hooks::{HookChain, HookFlow, HookRegistration};
pub use memory::{HistoryEntry, MemoryHistory};
pub use native::{NativeHistory, NativeHooks, PopEvent, StateChange};
pub use registry::{HistoryHookRegistry, HookKind};
