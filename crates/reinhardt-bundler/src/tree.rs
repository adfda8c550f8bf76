//! Route node tree.
//!
//! Nodes live in an arena owned by [`RouteTree`] and refer to each other by
//! [`NodeId`]. Ids are only meaningful for the tree that issued them.

use crate::error::BundleError;
use std::fmt;
use std::path::PathBuf;

/// Handle to a node of a [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Where a node's component comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
	/// A component module on disk.
	File(PathBuf),
	/// A named export of a generated bundle, loaded on demand.
	Bundled {
		/// Bundle file name, relative to the output directory.
		bundle: String,
		/// Export name inside the bundle.
		export: String,
	},
}

impl fmt::Display for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::File(path) => write!(f, "{}", path.display()),
			Self::Bundled { bundle, export } => {
				write!(f, "import(\"{bundle}\").then(r => r.{export})")
			}
		}
	}
}

/// Build-time directives attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMeta {
	/// `Some(true)` bundles this node and its descendants, `Some(false)`
	/// opts them out, `None` inherits from the nearest ancestor.
	pub bundle: Option<bool>,
}

/// A route node.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
	/// Identifier, also used as the export name in bundles.
	pub id: String,
	/// The node's component, if it renders one.
	pub component: Option<Component>,
	/// Directives.
	pub meta: NodeMeta,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

impl RouteNode {
	/// Creates a node without component or directives.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			component: None,
			meta: NodeMeta::default(),
			parent: None,
			children: Vec::new(),
		}
	}

	/// Sets a file component.
	pub fn with_component(mut self, path: impl Into<PathBuf>) -> Self {
		self.component = Some(Component::File(path.into()));
		self
	}

	/// Sets the bundle directive.
	pub fn with_bundle(mut self, bundle: bool) -> Self {
		self.meta.bundle = Some(bundle);
		self
	}

	/// Parent node, `None` for the root.
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// Child nodes in insertion order.
	pub fn children(&self) -> &[NodeId] {
		&self.children
	}
}

/// Arena of [`RouteNode`]s with a single root.
#[derive(Debug, Clone)]
pub struct RouteTree {
	nodes: Vec<RouteNode>,
}

impl RouteTree {
	/// Creates a tree containing only `root`.
	pub fn new(root: RouteNode) -> Self {
		let mut root = root;
		root.parent = None;
		root.children.clear();
		Self { nodes: vec![root] }
	}

	/// The root node.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always `false`: a tree has at least its root.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Appends `node` as the last child of `parent`.
	pub fn add_child(&mut self, parent: NodeId, node: RouteNode) -> Result<NodeId, BundleError> {
		self.check(parent)?;
		let id = NodeId(self.nodes.len());
		let mut node = node;
		node.parent = Some(parent);
		node.children.clear();
		self.nodes.push(node);
		self.nodes[parent.0].children.push(id);
		Ok(id)
	}

	/// Returns the node, if `id` belongs to this tree.
	pub fn get(&self, id: NodeId) -> Option<&RouteNode> {
		self.nodes.get(id.0)
	}

	/// Mutable access to a node.
	pub fn get_mut(&mut self, id: NodeId) -> Option<&mut RouteNode> {
		self.nodes.get_mut(id.0)
	}

	/// Ancestors of `id`, nearest first. Empty for unknown ids.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.get(id).and_then(RouteNode::parent), |id| {
			self.get(*id).and_then(RouteNode::parent)
		})
	}

	/// `id` followed by all of its descendants, in pre-order.
	pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>, BundleError> {
		self.check(id)?;
		let mut order = Vec::new();
		let mut stack = vec![id];
		while let Some(next) = stack.pop() {
			order.push(next);
			stack.extend(self.nodes[next.0].children.iter().rev().copied());
		}
		Ok(order)
	}

	/// The nearest of `id` and its ancestors carrying a bundle directive.
	pub fn bundle_instructor(&self, id: NodeId) -> Option<NodeId> {
		std::iter::once(id)
			.chain(self.ancestors(id))
			.find(|candidate| {
				self.get(*candidate)
					.is_some_and(|node| node.meta.bundle.is_some())
			})
	}

	fn check(&self, id: NodeId) -> Result<(), BundleError> {
		if id.0 < self.nodes.len() {
			Ok(())
		} else {
			Err(BundleError::UnknownNode(id))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> (RouteTree, [NodeId; 4]) {
		let mut tree = RouteTree::new(RouteNode::new("root"));
		let root = tree.root();
		let admin = tree
			.add_child(root, RouteNode::new("admin").with_bundle(true))
			.unwrap();
		let users = tree.add_child(admin, RouteNode::new("users")).unwrap();
		let about = tree.add_child(root, RouteNode::new("about")).unwrap();
		(tree, [root, admin, users, about])
	}

	#[rstest]
	fn test_subtree_is_pre_order() {
		let (tree, [root, admin, users, about]) = sample();

		assert_eq!(tree.subtree(root).unwrap(), vec![root, admin, users, about]);
		assert_eq!(tree.subtree(admin).unwrap(), vec![admin, users]);
	}

	#[rstest]
	fn test_ancestors_nearest_first() {
		let (tree, [root, admin, users, _]) = sample();

		assert_eq!(tree.ancestors(users).collect::<Vec<_>>(), vec![admin, root]);
		assert_eq!(tree.ancestors(root).count(), 0);
	}

	#[rstest]
	fn test_bundle_instructor_is_nearest_directive() {
		let (tree, [root, admin, users, about]) = sample();

		assert_eq!(tree.bundle_instructor(users), Some(admin));
		assert_eq!(tree.bundle_instructor(admin), Some(admin));
		assert_eq!(tree.bundle_instructor(about), None);
		assert_eq!(tree.bundle_instructor(root), None);
	}

	#[rstest]
	fn test_unknown_parent_is_rejected() {
		let (mut tree, _) = sample();
		let foreign = NodeId(99);

		let result = tree.add_child(foreign, RouteNode::new("ghost"));

		assert!(matches!(result, Err(BundleError::UnknownNode(id)) if id == foreign));
		assert_eq!(tree.len(), 4);
	}

	#[rstest]
	fn test_bundled_component_renders_dynamic_import() {
		let component = Component::Bundled {
			bundle: "admin-bundle.js".to_string(),
			export: "users".to_string(),
		};

		assert_eq!(
			component.to_string(),
			"import(\"admin-bundle.js\").then(r => r.users)"
		);
	}
}
