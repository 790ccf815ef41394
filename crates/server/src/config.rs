//! Server configuration.
//!
//! Values come from an optional TOML file and are then overridden by command-line
//! flags. Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! content_root = "/srv/adloc"
//! index_file = "platforms.txt"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the configuration file.
	#[error("I/O error reading {}: {source}", path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// Error parsing TOML syntax or an unknown key.
	#[error("invalid config {}: {source}", path.display())]
	Toml {
		/// Path to the file that failed to parse.
		path: PathBuf,
		/// The underlying parse error.
		#[source]
		source: toml::de::Error,
	},
}

/// Runtime settings for the HTTP host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
	/// Socket address to listen on.
	pub bind: SocketAddr,
	/// Directory relative load paths are resolved against.
	pub content_root: PathBuf,
	/// File loaded into the index before the listener starts.
	pub index_file: Option<PathBuf>,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
			content_root: PathBuf::from("."),
			index_file: None,
		}
	}
}

impl ServerConfig {
	/// Reads and parses the TOML file at `path`.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		toml::from_str(&text).map_err(|source| ConfigError::Toml {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Anchors a relative `content_root` at `cwd`.
	pub fn anchored(mut self, cwd: &Path) -> Self {
		if self.content_root.is_relative() {
			self.content_root = cwd.join(&self.content_root);
		}
		self
	}

	/// Resolves a load path: absolute paths are kept, relative ones join `content_root`.
	pub fn resolve(&self, raw: impl AsRef<Path>) -> PathBuf {
		resolve_path(&self.content_root, raw.as_ref())
	}
}

pub(crate) fn resolve_path(root: &Path, raw: &Path) -> PathBuf {
	if raw.is_absolute() {
		raw.to_path_buf()
	} else {
		root.join(raw)
	}
}
