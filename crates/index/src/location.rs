//! Hierarchical location paths.
//!
//! # Role
//!
//! Every path that enters the index, whether from an input line or a search query,
//! passes through [`normalize`] first. The normalized form is what gets stored,
//! displayed, and walked by [`prefixes`].
//!
//! # Invariants
//!
//! - A normalized path starts with `/`, contains no `//`, and ends with `/` only when it
//!   is the root itself.
//! - Location equality is case-insensitive. [`Location`] compares and hashes by its
//!   folded key, never by the display spelling.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Produces the canonical form of a location path.
///
/// Trims surrounding whitespace, collapses runs of `/`, forces a leading `/` and drops
/// a trailing `/` unless the result is the root.
pub fn normalize(raw: &str) -> String {
	let trimmed = raw.trim();
	let mut out = String::with_capacity(trimmed.len() + 1);
	if !trimmed.starts_with('/') {
		out.push('/');
	}
	for ch in trimmed.chars() {
		if ch == '/' && out.ends_with('/') {
			continue;
		}
		out.push(ch);
	}
	if out.len() > 1 && out.ends_with('/') {
		out.pop();
	}
	out
}

/// Case-folds a location or platform name into its comparison key.
pub fn fold(s: &str) -> String {
	s.to_lowercase()
}

/// Enumerates the ancestor prefixes of a normalized path, shortest first.
///
/// The bare root is never yielded: `/ru/svrd/revda` gives `/ru`, `/ru/svrd` and
/// `/ru/svrd/revda`, while `/` gives nothing.
///
/// Scanning starts after the first character, so an unnormalized path yields its
/// `/`-separated heads instead of failing.
pub fn prefixes(path: &str) -> Prefixes<'_> {
	Prefixes {
		path,
		scan: path.chars().next().map_or(0, char::len_utf8),
		done: path.is_empty() || path == "/",
	}
}

/// Iterator returned by [`prefixes`].
#[derive(Debug, Clone)]
pub struct Prefixes<'a> {
	path: &'a str,
	scan: usize,
	done: bool,
}

impl<'a> Iterator for Prefixes<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<&'a str> {
		if self.done {
			return None;
		}
		match self.path[self.scan..].find('/') {
			Some(offset) => {
				let end = self.scan + offset;
				self.scan = end + 1;
				Some(&self.path[..end])
			}
			None => {
				self.done = true;
				Some(self.path)
			}
		}
	}
}

impl std::iter::FusedIterator for Prefixes<'_> {}

/// A normalized location path.
///
/// Keeps the normalized spelling for display next to the folded key used for
/// equality, hashing and index lookups.
#[derive(Clone)]
pub struct Location {
	path: Box<str>,
	key: Box<str>,
}

impl Location {
	/// Normalizes `raw` into a location.
	pub fn new(raw: &str) -> Self {
		let path = normalize(raw);
		let key = fold(&path);
		Self {
			path: path.into_boxed_str(),
			key: key.into_boxed_str(),
		}
	}

	/// The normalized path with its original casing.
	pub fn as_str(&self) -> &str {
		&self.path
	}

	/// The case-folded key this location is stored and compared under.
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn is_root(&self) -> bool {
		&*self.path == "/"
	}

	/// Ancestor prefixes of the folded key, shortest first.
	pub fn key_prefixes(&self) -> Prefixes<'_> {
		prefixes(&self.key)
	}
}

impl PartialEq for Location {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Location {}

impl Hash for Location {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl fmt::Debug for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Location").field(&self.path).finish()
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path)
	}
}

impl From<&str> for Location {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("/ru/svrd/revda", "/ru/svrd/revda")]
	#[case("  /ru/svrd  ", "/ru/svrd")]
	#[case("/ru//svrd/", "/ru/svrd")]
	#[case("ru/svrd", "/ru/svrd")]
	#[case("///ru///", "/ru")]
	#[case("/", "/")]
	#[case("//", "/")]
	#[case("", "/")]
	#[case("   ", "/")]
	#[case("/Ru/Msk", "/Ru/Msk")]
	fn normalizes(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(normalize(raw), expected);
	}

	#[rstest]
	#[case("/ru/svrd/revda", &["/ru", "/ru/svrd", "/ru/svrd/revda"])]
	#[case("/ru", &["/ru"])]
	#[case("/", &[])]
	#[case("", &[])]
	#[case("éa/b", &["éa", "éa/b"])]
	#[case("/İ/x", &["/İ", "/İ/x"])]
	#[case("ru", &["ru"])]
	fn enumerates_prefixes(#[case] path: &str, #[case] expected: &[&str]) {
		assert_eq!(prefixes(path).collect::<Vec<_>>(), expected);
	}

	#[test]
	fn location_equality_ignores_case() {
		let upper = Location::new("/RU/Svrd");
		let lower = Location::new("/ru//svrd/");
		assert_eq!(upper, lower);
		assert_eq!(upper.as_str(), "/RU/Svrd");
		assert_eq!(lower.key(), "/ru/svrd");
	}

	#[test]
	fn key_prefixes_follow_folded_path() {
		let loc = Location::new("/RU/Svrd");
		assert_eq!(loc.key_prefixes().collect::<Vec<_>>(), ["/ru", "/ru/svrd"]);
		assert!(Location::new("  ").is_root());
	}

	proptest! {
		#[test]
		fn normalize_is_idempotent(raw in " {0,2}[a-zA-Z/]{0,20} {0,2}") {
			let once = normalize(&raw);
			prop_assert_eq!(normalize(&once), once.clone());
		}

		#[test]
		fn normalized_shape(raw in "[ a-z/]{0,24}") {
			let out = normalize(&raw);
			prop_assert!(out.starts_with('/'));
			prop_assert!(!out.contains("//"));
			prop_assert!(out == "/" || !out.ends_with('/'));
		}

		#[test]
		fn prefixes_accept_any_text(raw in any::<String>()) {
			let all: Vec<&str> = prefixes(&raw).collect();
			prop_assert!(all.iter().all(|p| raw.starts_with(p)));
			prop_assert!(raw.is_empty() || raw == "/" || all.last() == Some(&raw.as_str()));
		}

		#[test]
		fn last_prefix_is_full_path(raw in "(/[a-z]{1,4}){1,5}") {
			let out = normalize(&raw);
			prop_assert_eq!(prefixes(&out).last(), Some(out.as_str()));
		}
	}
}
