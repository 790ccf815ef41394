//! In-memory index of advertising platforms by hierarchical location.
//!
//! # Purpose
//!
//! Maps location paths such as `/ru/svrd/revda` to the platforms active there, and
//! answers "which platforms are visible at this location" by unioning every ancestor
//! prefix of the query path.
//!
//! # Mental Model
//!
//! 1. **Parse:** [`parse_line`] turns one `<platform>:<location>,...` line into a
//!    [`ParsedLine`] or a [`LineRejection`]. Rejected lines are skipped, never fatal.
//! 2. **Build:** a load pass accumulates accepted lines into a private
//!    [`IndexSnapshot`].
//! 3. **Publish:** the finished snapshot replaces the live one in a single atomic store.
//! 4. **Search:** readers load the current snapshot and walk the query's prefixes
//!    against it, holding that one snapshot for the whole walk.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`PlatformIndex`] | Owns the live snapshot; exposes load and search. |
//! | [`IndexSnapshot`] | Immutable location → platform-set mapping. |
//! | [`Location`] | Normalized path with a case-folded comparison key. |
//! | [`LoadError`] | File-level failures that abort a load. |
//!
//! # Concurrency
//!
//! - **Reads:** Lock-free (atomic load of the current snapshot).
//! - **Writes:** Parsing runs without any lock. Publication takes a short mutex so
//!   concurrent loads are ordered and numbered, then swaps the pointer.
//!
//! # Error Policy
//!
//! Malformed lines are data-quality issues and are dropped silently (traced at
//! `trace` level). Missing or unreadable sources are availability issues and abort
//! the load with a [`LoadError`], leaving the live snapshot untouched.

mod engine;
pub mod error;
pub mod location;
pub mod parse;
mod snapshot;

pub use engine::{LoadReport, PlatformIndex};
pub use error::LoadError;
pub use location::{Location, normalize};
pub use parse::{LineRejection, ParsedLine, parse_line};
pub use snapshot::{IndexSnapshot, PlatformSet};

#[cfg(any(test, doc))]
pub(crate) mod invariants;

#[cfg(test)]
mod tests;
