//! Reflector configuration.
//!
//! [`ReflectorConfig`] can be embedded in an application's settings file:
//!
//! ```toml
//! [navigation]
//! fallback_url = "/"
//! resync_on_uninstall = true
//! stamp_owner = true
//! ```

use serde::{Deserialize, Serialize};

/// Settings shared by every reflector of a [`NavigationContext`](crate::NavigationContext).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
	/// URL written when the browser adapter produces no composite URL.
	pub fallback_url: String,

	/// Re-reflect the remaining routers on the next tick after a reflector
	/// is uninstalled.
	pub resync_on_uninstall: bool,

	/// Tag outbound history state with the writing router's name.
	pub stamp_owner: bool,
}

impl Default for ReflectorConfig {
	fn default() -> Self {
		Self {
			fallback_url: "/".to_string(),
			resync_on_uninstall: true,
			stamp_owner: true,
		}
	}
}

impl ReflectorConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the fallback URL.
	pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
		self.fallback_url = url.into();
		self
	}

	/// Enables or disables the deferred resync on uninstall.
	pub fn with_resync_on_uninstall(mut self, enabled: bool) -> Self {
		self.resync_on_uninstall = enabled;
		self
	}

	/// Enables or disables owner stamping of outbound state.
	pub fn with_stamp_owner(mut self, enabled: bool) -> Self {
		self.stamp_owner = enabled;
		self
	}
}
