//! Bundle generation.

use crate::error::BundleError;
use crate::tree::{Component, NodeId, RouteTree};
use std::fs;
use std::path::{Component as PathComponent, Path, PathBuf};

/// A bundle file written by [`create_bundles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenBundle {
	/// Node whose directive opened the bundle.
	pub instructor: NodeId,
	/// Nodes grouped into the bundle, in pre-order.
	pub members: Vec<NodeId>,
	/// Path of the generated file.
	pub path: PathBuf,
}

/// Groups the components of `from` and its descendants into bundle files.
///
/// Each node joins the bundle of the nearest node among itself and its
/// ancestors that carries a bundle directive, if that directive is `true`.
/// Every bundle is written to `<output_dir>/<instructor id>-bundle.js` and
/// re-exports each member's component under the member's id. Member
/// components are then rewritten to load from the bundle on demand.
///
/// Members without a file component are grouped but neither exported nor
/// rewritten.
pub fn create_bundles(
	tree: &mut RouteTree,
	from: NodeId,
	output_dir: &Path,
) -> Result<Vec<WrittenBundle>, BundleError> {
	let mut groups: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
	for node in tree.subtree(from)? {
		let Some(instructor) = tree.bundle_instructor(node) else {
			continue;
		};
		let enabled = tree
			.get(instructor)
			.and_then(|instructor| instructor.meta.bundle)
			.unwrap_or(false);
		if !enabled {
			continue;
		}
		match groups.iter_mut().find(|(id, _)| *id == instructor) {
			Some((_, members)) => members.push(node),
			None => groups.push((instructor, vec![node])),
		}
	}

	if groups.is_empty() {
		return Ok(Vec::new());
	}
	fs::create_dir_all(output_dir).map_err(|err| BundleError::io(output_dir, err))?;

	let mut written = Vec::with_capacity(groups.len());
	for (instructor, members) in groups {
		written.push(write_bundle(tree, instructor, members, output_dir)?);
	}
	Ok(written)
}

fn write_bundle(
	tree: &mut RouteTree,
	instructor: NodeId,
	members: Vec<NodeId>,
	output_dir: &Path,
) -> Result<WrittenBundle, BundleError> {
	let instructor_id = &tree
		.get(instructor)
		.ok_or(BundleError::UnknownNode(instructor))?
		.id;
	let filename = format!("{instructor_id}-bundle.js");
	let path = output_dir.join(&filename);

	let mut exports = Vec::new();
	for member in &members {
		let node = tree.get(*member).ok_or(BundleError::UnknownNode(*member))?;
		if let Some(Component::File(component)) = &node.component {
			let import = import_path(output_dir, component)
				.map_err(|err| BundleError::io(component, err))?;
			exports.push(format!("export {{ default as {} }} from '{import}'", node.id));
		}
	}
	fs::write(&path, exports.join("\n")).map_err(|err| BundleError::io(&path, err))?;
	tracing::debug!(
		bundle = %path.display(),
		exports = exports.len(),
		"wrote route bundle"
	);

	for member in &members {
		let Some(node) = tree.get_mut(*member) else {
			continue;
		};
		if matches!(node.component, Some(Component::File(_))) {
			node.component = Some(Component::Bundled {
				bundle: filename.clone(),
				export: node.id.clone(),
			});
		}
	}

	Ok(WrittenBundle {
		instructor,
		members,
		path,
	})
}

/// `component` relative to `output_dir`, with forward slashes and a leading
/// `./` when the path does not already start with a dot segment.
fn import_path(output_dir: &Path, component: &Path) -> std::io::Result<String> {
	let (base, target) = if output_dir.is_absolute() == component.is_absolute() {
		(output_dir.to_path_buf(), component.to_path_buf())
	} else {
		let cwd = std::env::current_dir()?;
		(cwd.join(output_dir), cwd.join(component))
	};
	let relative = pathdiff::diff_paths(&target, &base).unwrap_or(target);

	let segments: Vec<String> = relative
		.components()
		.map(|segment| match segment {
			PathComponent::ParentDir => "..".to_string(),
			PathComponent::CurDir => ".".to_string(),
			other => other.as_os_str().to_string_lossy().into_owned(),
		})
		.collect();
	let joined = segments.join("/");
	if joined.starts_with('.') || joined.starts_with('/') {
		Ok(joined)
	} else {
		Ok(format!("./{joined}"))
	}
}
