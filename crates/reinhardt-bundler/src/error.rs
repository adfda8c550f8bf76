//! Bundler errors.

use crate::tree::NodeId;
use std::path::PathBuf;

/// Error type for bundle generation.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
	/// Creating the output directory or writing a bundle failed.
	#[error("failed to write `{}`: {source}", path.display())]
	Io {
		/// File or directory being written.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// The node id does not belong to the tree.
	#[error("unknown route node {0}")]
	UnknownNode(NodeId),
}

impl BundleError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}
