//! Live index container with atomic publication.
//!
//! # Role
//!
//! This module provides the thread-safe entrypoint for loading and searching the
//! location index. A load builds a complete [`IndexSnapshot`] privately and then
//! publishes it with a single [`ArcSwap`] store.
//!
//! # Invariants
//!
//! - Searches never observe a mix of two snapshots (see `invariants::test_no_torn_reads`).
//! - A failed load leaves the live snapshot untouched (see
//!   `invariants::test_failed_load_preserves_live`).
//! - Generations are assigned in publish order (see
//!   `invariants::test_concurrent_loads_serialized`).

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{info, trace, warn};

use crate::error::{LoadError, Result};
use crate::location::Location;
use crate::parse::parse_line;
use crate::snapshot::{IndexSnapshot, SnapshotBuilder};

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
	/// Generation of the snapshot this load published.
	pub generation: u64,
	/// Lines read from the source.
	pub lines: usize,
	/// Lines that produced at least one location.
	pub accepted: usize,
	/// Lines skipped by the parser.
	pub rejected: usize,
	/// Distinct locations in the published snapshot.
	pub locations: usize,
	/// Distinct platforms in the published snapshot.
	pub platforms: usize,
}

/// The location index: one live snapshot, replaced wholesale by each load.
///
/// Intended to be owned by the host (usually behind an `Arc`) and shared between a
/// single logical writer and any number of concurrent readers.
pub struct PlatformIndex {
	live: ArcSwap<IndexSnapshot>,
	/// Serializes publication and holds the last assigned generation.
	publish: Mutex<u64>,
}

impl Default for PlatformIndex {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for PlatformIndex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.live.load();
		f.debug_struct("PlatformIndex")
			.field("generation", &snap.generation())
			.field("locations", &snap.location_count())
			.finish()
	}
}

impl PlatformIndex {
	/// Creates an index that has never been loaded. Every search returns nothing.
	pub fn new() -> Self {
		Self {
			live: ArcSwap::from_pointee(IndexSnapshot::empty()),
			publish: Mutex::new(0),
		}
	}

	/// Returns the platforms visible at `location`, sorted case-insensitively.
	///
	/// Never fails: blank input and a never-loaded index both yield an empty list.
	pub fn search(&self, location: &str) -> Vec<String> {
		if location.trim().is_empty() {
			return Vec::new();
		}
		let location = Location::new(location);
		let snap = self.live.load();
		let hits = snap.visible_at(&location);
		trace!(location = %location, generation = snap.generation(), hits = hits.len(), "search");
		hits
	}

	/// Returns the current snapshot. It stays valid and unchanged across later loads.
	pub fn snapshot(&self) -> Arc<IndexSnapshot> {
		self.live.load_full()
	}

	/// Generation of the live snapshot. `0` until the first successful load.
	pub fn generation(&self) -> u64 {
		self.live.load().generation()
	}

	/// Loads the file at `path` into a new snapshot and publishes it.
	pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
		let path = path.as_ref();
		if path.to_string_lossy().trim().is_empty() {
			return Err(LoadError::EmptyPath);
		}

		let file = File::open(path).map_err(|source| {
			let err = if source.kind() == ErrorKind::NotFound {
				LoadError::SourceNotFound {
					path: path.to_path_buf(),
				}
			} else {
				LoadError::SourceUnreadable {
					path: path.to_path_buf(),
					source,
				}
			};
			warn!(path = %path.display(), error = %err, "index load failed");
			err
		})?;

		self.load_reader(BufReader::new(file), path)
	}

	/// Loads lines from `reader` into a new snapshot and publishes it.
	///
	/// `origin` names the source in errors and logs.
	pub fn load_reader<R: BufRead>(&self, reader: R, origin: &Path) -> Result<LoadReport> {
		let (snapshot, lines, accepted) = build_snapshot(reader, origin).inspect_err(|err| {
			warn!(path = %origin.display(), error = %err, "index load failed");
		})?;

		let locations = snapshot.location_count();
		let platforms = snapshot.platform_count();
		let generation = self.publish(snapshot);

		info!(
			path = %origin.display(),
			generation,
			lines,
			accepted,
			rejected = lines - accepted,
			locations,
			platforms,
			"index published"
		);

		Ok(LoadReport {
			generation,
			lines,
			accepted,
			rejected: lines - accepted,
			locations,
			platforms,
		})
	}

	fn publish(&self, mut snapshot: IndexSnapshot) -> u64 {
		let mut last = self.publish.lock();
		*last += 1;
		snapshot.generation = *last;
		self.live.store(Arc::new(snapshot));
		*last
	}
}

/// Reads every line of `reader` into a fresh snapshot.
///
/// Returns the snapshot with the number of lines read and accepted.
fn build_snapshot<R: BufRead>(reader: R, origin: &Path) -> Result<(IndexSnapshot, usize, usize)> {
	let mut builder = SnapshotBuilder::new();
	let mut lines = 0;
	let mut accepted = 0;

	for (idx, line) in reader.lines().enumerate() {
		let line = line.map_err(|source| {
			if source.kind() == ErrorKind::InvalidData {
				LoadError::Parse {
					path: origin.to_path_buf(),
					line: idx + 1,
					source,
				}
			} else {
				LoadError::SourceUnreadable {
					path: origin.to_path_buf(),
					source,
				}
			}
		})?;
		lines += 1;

		let text = if idx == 0 {
			line.strip_prefix('\u{feff}').unwrap_or(&line)
		} else {
			&line
		};

		match parse_line(text) {
			Ok(parsed) => {
				builder.insert(&parsed.platform, &parsed.locations);
				accepted += 1;
			}
			Err(reason) => trace!(line = idx + 1, %reason, "skipping line"),
		}
	}

	Ok((builder.build(), lines, accepted))
}
