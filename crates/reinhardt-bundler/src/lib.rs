//! Reinhardt Bundler - route component bundles
//!
//! Groups lazily loaded route components into shared chunk files at build
//! time. A node opts its subtree in with `bundle: true` (or out with
//! `bundle: false`); every opted-in node is re-exported from a single
//! `<id>-bundle.js` named after the node carrying the directive, and its
//! component is rewritten to a dynamic import of that file.
//!
//! ## Example
//!
//! ```no_run
//! use reinhardt_bundler::{RouteNode, RouteTree, create_bundles};
//! use std::path::Path;
//!
//! let mut tree = RouteTree::new(RouteNode::new("root"));
//! let root = tree.root();
//! let admin = RouteNode::new("admin")
//!     .with_bundle(true)
//!     .with_component("src/admin.svelte");
//! let admin = tree.add_child(root, admin).unwrap();
//! tree.add_child(admin, RouteNode::new("users").with_component("src/users.svelte"))
//!     .unwrap();
//!
//! let bundles = create_bundles(&mut tree, root, Path::new("build/bundles")).unwrap();
//! assert_eq!(bundles.len(), 1);
//! ```

pub mod bundle;
pub mod error;
pub mod tree;

pub use bundle::{WrittenBundle, create_bundles};
pub use error::BundleError;
pub use tree::{Component, NodeId, NodeMeta, RouteNode, RouteTree};
