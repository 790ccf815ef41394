//! Error types for index loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load.
///
/// Every variant leaves the live index exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The caller passed an empty or whitespace-only path.
	#[error("file path is empty")]
	EmptyPath,

	/// The source file does not exist.
	#[error("file not found: {}", path.display())]
	SourceNotFound {
		/// Path that was looked up.
		path: PathBuf,
	},

	/// The source could not be opened or failed while being read.
	#[error("failed to read {}: {source}", path.display())]
	SourceUnreadable {
		/// Path of the source being read.
		path: PathBuf,
		/// The underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// The source is readable but is not UTF-8 text.
	#[error("{}:{line}: not valid UTF-8 text", path.display())]
	Parse {
		/// Path of the source being read.
		path: PathBuf,
		/// 1-based line number where decoding failed.
		line: usize,
		/// The underlying decode error.
		#[source]
		source: std::io::Error,
	},
}

impl LoadError {
	/// Path the failed load referred to, if one was given.
	pub fn path(&self) -> Option<&std::path::Path> {
		match self {
			LoadError::EmptyPath => None,
			LoadError::SourceNotFound { path }
			| LoadError::SourceUnreadable { path, .. }
			| LoadError::Parse { path, .. } => Some(path),
		}
	}
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
