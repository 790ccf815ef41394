//! Immutable index snapshots.
//!
//! # Role
//!
//! This module holds the pure view types that searches run against, plus the private
//! builder that one load pass fills in. It contains no publication logic.
//!
//! # Invariants
//!
//! - Every key in [`IndexSnapshot`] is a folded, normalized location.
//! - Every stored [`PlatformSet`] is non-empty.
//! - A snapshot is never mutated after [`SnapshotBuilder::build`] hands it out.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::location::{Location, fold};

/// Platforms active at one location.
///
/// Names are unique case-insensitively. The first spelling inserted wins and
/// iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct PlatformSet {
	names: IndexMap<Box<str>, Arc<str>, FxBuildHasher>,
}

impl PlatformSet {
	fn insert(&mut self, name: Arc<str>) -> bool {
		let key = fold(&name).into_boxed_str();
		if self.names.contains_key(&key) {
			return false;
		}
		self.names.insert(key, name);
		true
	}

	/// Case-insensitive membership test.
	pub fn contains(&self, name: &str) -> bool {
		self.names.contains_key(fold(name).as_str())
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Platform names in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.names.values().map(|name| &**name)
	}

	fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.names.iter().map(|(key, name)| (&**key, &**name))
	}
}

/// One complete mapping from locations to the platforms active there.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
	by_location: FxHashMap<Box<str>, PlatformSet>,
	platform_count: usize,
	pub(crate) generation: u64,
}

impl IndexSnapshot {
	/// The snapshot a never-loaded index starts with.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Publish counter of this snapshot. `0` means it was never published by a load.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Number of distinct locations carrying at least one platform.
	pub fn location_count(&self) -> usize {
		self.by_location.len()
	}

	/// Number of distinct platform names, compared case-insensitively.
	pub fn platform_count(&self) -> usize {
		self.platform_count
	}

	pub fn is_empty(&self) -> bool {
		self.by_location.is_empty()
	}

	/// Platforms registered exactly at `location`, without ancestor expansion.
	pub fn platforms_at(&self, location: &str) -> Option<&PlatformSet> {
		self.by_location.get(Location::new(location).key())
	}

	/// Platforms visible at `location`: the union over every ancestor prefix,
	/// deduplicated case-insensitively and sorted case-insensitively.
	pub fn visible_at(&self, location: &Location) -> Vec<String> {
		let mut hits: FxHashMap<&str, &str> = FxHashMap::default();
		for prefix in location.key_prefixes() {
			let Some(set) = self.by_location.get(prefix) else {
				continue;
			};
			for (key, name) in set.entries() {
				hits.entry(key).or_insert(name);
			}
		}

		let mut sorted: Vec<(&str, &str)> = hits.into_iter().collect();
		sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));
		sorted.into_iter().map(|(_, name)| name.to_owned()).collect()
	}
}

/// Accumulates one load pass into a private snapshot.
#[derive(Debug, Default)]
pub(crate) struct SnapshotBuilder {
	by_location: FxHashMap<Box<str>, PlatformSet>,
	spellings: FxHashSet<Arc<str>>,
	platforms: FxHashSet<Box<str>>,
}

impl SnapshotBuilder {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Adds `platform` to the set of every location in `locations`.
	pub(crate) fn insert(&mut self, platform: &str, locations: &[Location]) {
		let name = match self.spellings.get(platform) {
			Some(name) => Arc::clone(name),
			None => {
				let name: Arc<str> = Arc::from(platform);
				self.spellings.insert(Arc::clone(&name));
				name
			}
		};
		self.platforms.insert(fold(platform).into_boxed_str());

		for location in locations {
			self.by_location
				.entry(Box::from(location.key()))
				.or_default()
				.insert(Arc::clone(&name));
		}
	}

	pub(crate) fn build(self) -> IndexSnapshot {
		IndexSnapshot {
			by_location: self.by_location,
			platform_count: self.platforms.len(),
			generation: 0,
		}
	}
}
