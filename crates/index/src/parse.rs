//! Line parser for the `<platform>:<location>[,<location>...]` input format.
//!
//! A line either yields a [`ParsedLine`] or is rejected with a [`LineRejection`].
//! Rejections are a data-quality signal, not a failure: the loader counts and traces
//! them and carries on with the next line.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use thiserror::Error;

use crate::location::Location;

/// A validated input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
	/// Platform name, whitespace-trimmed but otherwise as written.
	pub platform: String,
	/// Normalized locations, deduplicated case-insensitively in first-seen order.
	/// Never empty.
	pub locations: Vec<Location>,
}

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineRejection {
	#[error("blank line")]
	Blank,
	#[error("no ':' separator")]
	MissingSeparator,
	#[error("empty platform name")]
	EmptyPlatform,
	#[error("empty location list")]
	EmptyLocations,
	#[error("no location starts with '/'")]
	NoRootedLocations,
}

/// Parses one raw input line.
pub fn parse_line(raw: &str) -> Result<ParsedLine, LineRejection> {
	let line = raw.trim();
	if line.is_empty() {
		return Err(LineRejection::Blank);
	}

	let colon = line.find(':').ok_or(LineRejection::MissingSeparator)?;
	if colon == 0 {
		return Err(LineRejection::EmptyPlatform);
	}
	if colon + 1 == line.len() {
		return Err(LineRejection::EmptyLocations);
	}

	let platform = line[..colon].trim();
	if platform.is_empty() {
		return Err(LineRejection::EmptyPlatform);
	}
	let right = line[colon + 1..].trim();
	if right.is_empty() {
		return Err(LineRejection::EmptyLocations);
	}

	let mut any_piece = false;
	let mut locations: IndexSet<Location, FxBuildHasher> = IndexSet::default();
	for piece in right.split(',').map(str::trim).filter(|p| !p.is_empty()) {
		any_piece = true;
		if piece.starts_with('/') {
			locations.insert(Location::new(piece));
		}
	}

	if locations.is_empty() {
		return Err(if any_piece {
			LineRejection::NoRootedLocations
		} else {
			LineRejection::EmptyLocations
		});
	}

	Ok(ParsedLine {
		platform: platform.to_owned(),
		locations: locations.into_iter().collect(),
	})
}
