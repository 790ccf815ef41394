#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::PlatformIndex;
use crate::error::LoadError;

fn load_text(index: &PlatformIndex, text: &str) -> crate::engine::LoadReport {
	index
		.load_reader(Cursor::new(text.as_bytes()), Path::new("memory"))
		.unwrap()
}

/// Text whose two platforms sit at different depths, both tagged with `round`.
fn tagged_text(round: usize) -> String {
	format!("P{round}a:/r\nP{round}b:/r/s\n")
}

/// Invariant: a held snapshot stays alive and unchanged across a publish.
pub(crate) fn inv_snapshot_liveness_across_swap() {
	let index = PlatformIndex::new();
	load_text(&index, "Old:/ru");

	let held = index.snapshot();
	assert_eq!(held.generation(), 1);

	load_text(&index, "New:/ru");
	assert_eq!(index.search("/ru"), ["New"]);

	// The held snapshot still answers with the data it was built from.
	assert!(held.platforms_at("/ru").unwrap().contains("Old"));
	assert!(!held.platforms_at("/ru").unwrap().contains("New"));
	assert_eq!(
		Arc::strong_count(&held),
		1,
		"superseded snapshot should only be kept alive by its reader"
	);
}

#[cfg_attr(test, test)]
pub(crate) fn test_snapshot_liveness_across_swap() {
	inv_snapshot_liveness_across_swap()
}

/// Invariant: a search sees either the old or the new snapshot, never both.
pub(crate) fn inv_no_torn_reads() {
	const ROUNDS: usize = 200;
	const READERS: usize = 4;

	let index = PlatformIndex::new();
	load_text(&index, &tagged_text(0));
	let done = AtomicBool::new(false);

	std::thread::scope(|scope| {
		for _ in 0..READERS {
			scope.spawn(|| {
				while !done.load(Ordering::Acquire) {
					let hits = index.search("/r/s");
					assert_eq!(hits.len(), 2, "torn read: {hits:?}");
					let round = hits[0].trim_start_matches('P').trim_end_matches('a');
					assert_eq!(hits[1], format!("P{round}b"), "torn read: {hits:?}");
				}
			});
		}

		for round in 1..=ROUNDS {
			load_text(&index, &tagged_text(round));
		}
		done.store(true, Ordering::Release);
	});

	assert_eq!(index.generation(), ROUNDS as u64 + 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_no_torn_reads() {
	inv_no_torn_reads()
}

/// Invariant: a failed load leaves the live snapshot exactly as it was.
pub(crate) fn inv_failed_load_preserves_live() {
	let index = PlatformIndex::new();
	load_text(&index, "A:/ru");
	let before = index.snapshot();

	let missing = std::env::temp_dir().join("adloc-index-missing-file.txt");
	let err = index.load(&missing).unwrap_err();
	assert!(matches!(err, LoadError::SourceNotFound { .. }), "{err:?}");

	let invalid = index
		.load_reader(Cursor::new(b"A:/ru\nB:/ru/\xff\n".as_slice()), Path::new("memory"))
		.unwrap_err();
	assert!(matches!(invalid, LoadError::Parse { line: 2, .. }), "{invalid:?}");

	assert!(Arc::ptr_eq(&before, &index.snapshot()));
	assert_eq!(index.generation(), 1);
	assert_eq!(index.search("/ru"), ["A"]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_failed_load_preserves_live() {
	inv_failed_load_preserves_live()
}

/// Invariant: concurrent loads each publish once, with distinct generations.
pub(crate) fn inv_concurrent_loads_serialized() {
	const WRITERS: usize = 8;

	let index = PlatformIndex::new();
	let mut generations: Vec<u64> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..WRITERS)
			.map(|round| {
				let index = &index;
				scope.spawn(move || load_text(index, &tagged_text(round)).generation)
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	generations.sort_unstable();
	assert_eq!(generations, (1..=WRITERS as u64).collect::<Vec<_>>());
	assert_eq!(index.generation(), WRITERS as u64);
	assert_eq!(index.search("/r/s").len(), 2);
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_loads_serialized() {
	inv_concurrent_loads_serialized()
}
