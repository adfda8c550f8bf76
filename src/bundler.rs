//! Route component bundling
//!
//! Build-time only. Typically called from a build script after the route tree
//! has been assembled.

pub use reinhardt_bundler::*;
