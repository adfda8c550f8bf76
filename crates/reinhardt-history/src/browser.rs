//! `window.history` backend (WASM only).
//!
//! Hooking re-points `history.pushState` / `history.replaceState` at the
//! registry's chains, keeps the originals as `history.pushStateNative` /
//! `history.replaceStateNative`, and attaches the pop chain to the window's
//! `popstate` event. A marker property on `window.history` keeps a second
//! installation (for example from another WASM module on the same page) from
//! wrapping the already-wrapped functions.

use crate::error::HistoryError;
use crate::native::{NativeHistory, NativeHooks, PopEvent, StateChange};
use js_sys::{Function, JSON, Reflect};
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{History, PopStateEvent, Window};

const HOOKED_MARKER: &str = "__reinhardtHistoryHooks";
const PUSH_STATE: &str = "pushState";
const REPLACE_STATE: &str = "replaceState";
const PUSH_STATE_NATIVE: &str = "pushStateNative";
const REPLACE_STATE_NATIVE: &str = "replaceStateNative";

/// [`NativeHistory`] over the browser's `window.history`.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: Window,
	history: History,
}

impl BrowserHistory {
	/// Binds to the current window's history.
	pub fn new() -> Result<Self, HistoryError> {
		let window = web_sys::window().ok_or(HistoryError::Unavailable)?;
		let history = window.history().map_err(|_| HistoryError::Unavailable)?;
		Ok(Self { window, history })
	}

	/// Resolves the original native function, preferring the saved copy.
	fn native_fn(&self, saved: &str, public: &str) -> Result<Function, HistoryError> {
		let value = Reflect::get(&self.history, &JsValue::from_str(saved)).map_err(js_error)?;
		let value = if value.is_undefined() {
			Reflect::get(&self.history, &JsValue::from_str(public)).map_err(js_error)?
		} else {
			value
		};
		value
			.dyn_into::<Function>()
			.map_err(|_| HistoryError::NativeCall(format!("history.{public} is not callable")))
	}

	fn call_native(
		&self,
		saved: &str,
		public: &str,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		let function = self.native_fn(saved, public)?;
		let state = to_js(state)?;
		function
			.call3(
				&self.history,
				&state,
				&JsValue::from_str(title),
				&JsValue::from_str(url),
			)
			.map(|_| ())
			.map_err(js_error)
	}

	fn set(&self, key: &str, value: &JsValue) -> Result<(), HistoryError> {
		Reflect::set(&self.history, &JsValue::from_str(key), value)
			.map(|_| ())
			.map_err(js_error)
	}

	fn entry_point(
		&self,
		hook: Rc<dyn Fn(StateChange)>,
	) -> Closure<dyn Fn(JsValue, JsValue, JsValue)> {
		let window = self.window.clone();
		Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(
			move |state: JsValue, title: JsValue, url: JsValue| {
				let url = url.as_string().unwrap_or_else(|| location_of(&window));
				hook(StateChange::new(
					from_js(&state),
					title.as_string().unwrap_or_default(),
					url,
				));
			},
		)
	}
}

impl NativeHistory for BrowserHistory {
	fn push_state(&self, state: Option<&Value>, title: &str, url: &str) -> Result<(), HistoryError> {
		self.call_native(PUSH_STATE_NATIVE, PUSH_STATE, state, title, url)
	}

	fn replace_state(
		&self,
		state: Option<&Value>,
		title: &str,
		url: &str,
	) -> Result<(), HistoryError> {
		self.call_native(REPLACE_STATE_NATIVE, REPLACE_STATE, state, title, url)
	}

	fn location(&self) -> String {
		location_of(&self.window)
	}

	fn is_hooked(&self) -> bool {
		Reflect::get(&self.history, &JsValue::from_str(HOOKED_MARKER))
			.map(|value| value.is_truthy())
			.unwrap_or(false)
	}

	fn hook(&self, hooks: NativeHooks) -> Result<(), HistoryError> {
		// Keep the originals callable before overwriting them
		for (public, saved) in [
			(PUSH_STATE, PUSH_STATE_NATIVE),
			(REPLACE_STATE, REPLACE_STATE_NATIVE),
		] {
			let original = Reflect::get(&self.history, &JsValue::from_str(public)).map_err(js_error)?;
			self.set(saved, &original)?;
		}

		let push = self.entry_point(hooks.push_state);
		self.set(PUSH_STATE, push.as_ref())?;
		push.forget();

		let replace = self.entry_point(hooks.replace_state);
		self.set(REPLACE_STATE, replace.as_ref())?;
		replace.forget();

		let pop_hook = hooks.pop_state;
		let pop = Closure::<dyn Fn(PopStateEvent)>::new(move |event: PopStateEvent| {
			pop_hook(PopEvent {
				state: from_js(&event.state()),
			});
		});
		self.window
			.add_event_listener_with_callback("popstate", pop.as_ref().unchecked_ref())
			.map_err(js_error)?;
		// The listener lives as long as the page
		pop.forget();

		self.set(HOOKED_MARKER, &JsValue::TRUE)
	}
}

fn location_of(window: &Window) -> String {
	let location = window.location();
	format!(
		"{}{}{}",
		location.pathname().unwrap_or_default(),
		location.search().unwrap_or_default(),
		location.hash().unwrap_or_default()
	)
}

fn to_js(state: Option<&Value>) -> Result<JsValue, HistoryError> {
	match state {
		None => Ok(JsValue::NULL),
		Some(value) => {
			let text = serde_json::to_string(value)?;
			JSON::parse(&text).map_err(js_error)
		}
	}
}

fn from_js(value: &JsValue) -> Option<Value> {
	if value.is_null() || value.is_undefined() {
		return None;
	}
	let text: String = JSON::stringify(value).ok()?.into();
	serde_json::from_str(&text).ok()
}

fn js_error(err: JsValue) -> HistoryError {
	HistoryError::NativeCall(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
