//! Address-bar reflection
//!
//! Routers, their address reflectors and the traits through which the
//! application translates between browser and router URLs.

pub use reinhardt_reflect::*;
