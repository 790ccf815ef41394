use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use crate::location::fold;
use crate::{LoadError, PlatformIndex};

fn write_lines(lines: &[&str]) -> NamedTempFile {
	let mut file = NamedTempFile::new().expect("temp file");
	for line in lines {
		writeln!(file, "{line}").expect("write line");
	}
	file.flush().expect("flush");
	file
}

#[fixture]
fn regional() -> (PlatformIndex, NamedTempFile) {
	let file = write_lines(&[
		"Яндекс.Директ:/ru",
		"Ревдинский рабочий:/ru/svrd/revda,/ru/svrd/pervik",
		"Крутая реклама:/ru/svrd",
	]);
	let index = PlatformIndex::new();
	index.load(file.path()).expect("load");
	(index, file)
}

#[test]
fn never_loaded_index_returns_nothing() {
	let index = PlatformIndex::new();
	assert!(index.search("/ru/msk").is_empty());
	assert!(index.search("").is_empty());
	assert_eq!(index.generation(), 0);
}

#[rstest]
#[case("/ru", &["Яндекс.Директ"])]
#[case("/ru/svrd", &["Крутая реклама", "Яндекс.Директ"])]
#[case("/ru/svrd/revda", &["Крутая реклама", "Ревдинский рабочий", "Яндекс.Директ"])]
#[case("/ru/svrd/pervik", &["Крутая реклама", "Ревдинский рабочий", "Яндекс.Директ"])]
#[case("/ru/novosib", &["Яндекс.Директ"])]
#[case("/en", &[])]
fn searches_regional_file(
	regional: (PlatformIndex, NamedTempFile),
	#[case] location: &str,
	#[case] expected: &[&str],
) {
	let (index, _file) = regional;
	assert_eq!(index.search(location), expected);
}

#[test]
fn concrete_scenario() {
	let file = write_lines(&["A:/ru", "B:/ru/svrd/revda,/ru/svrd/pervik", "C:/ru/svrd"]);
	let index = PlatformIndex::new();
	let report = index.load(file.path()).unwrap();

	assert_eq!(report.generation, 1);
	assert_eq!(report.lines, 3);
	assert_eq!(report.accepted, 3);
	assert_eq!(report.locations, 4);
	assert_eq!(report.platforms, 3);

	assert_eq!(index.search("/ru"), ["A"]);
	assert_eq!(index.search("/ru/svrd"), ["A", "C"]);
	assert_eq!(index.search("/ru/svrd/revda"), ["A", "B", "C"]);
	assert_eq!(index.search("/ru/novosib"), ["A"]);
}

#[test]
fn search_ignores_case_and_slashes() {
	let file = write_lines(&["name:/a,/a/b"]);
	let index = PlatformIndex::new();
	index.load(file.path()).unwrap();

	assert_eq!(index.search("/a"), ["name"]);
	assert_eq!(index.search("/a/b"), ["name"]);
	assert!(index.search("/c").is_empty());
	assert_eq!(index.search("/A/B"), index.search("/a/b"));
	assert_eq!(index.search("  a//b/ "), ["name"]);
}

#[test]
fn normalized_queries_are_equivalent() {
	let file = write_lines(&["A:/ru", "C:/ru/svrd"]);
	let index = PlatformIndex::new();
	index.load(file.path()).unwrap();
	assert_eq!(index.search("/ru//svrd/"), index.search("/ru/svrd"));
}

#[test]
fn ignores_invalid_lines() {
	let file = write_lines(&[
		"просто строка без всего",
		" :/ru/msk",
		":/x",
		"name:",
		"Газета:/ru/msk",
		"",
	]);
	let index = PlatformIndex::new();
	let report = index.load(file.path()).unwrap();

	assert_eq!(report.accepted, 1);
	assert_eq!(report.rejected, 5);
	assert_eq!(index.search("/ru/msk"), ["Газета"]);
}

#[test]
fn duplicates_collapse() {
	let file = write_lines(&["Яндекс.Директ:/ru", "Яндекс.Директ:/ru", "ЯНДЕКС.директ:/RU"]);
	let index = PlatformIndex::new();
	index.load(file.path()).unwrap();
	assert_eq!(index.search("/ru"), ["Яндекс.Директ"]);
}

#[test]
fn unknown_child_sees_only_ancestors() {
	let file = write_lines(&["Яндекс.Директ:/ru", "Газета уральских москвичей:/ru/msk"]);
	let index = PlatformIndex::new();
	index.load(file.path()).unwrap();
	assert_eq!(index.search("/ru/novosib"), ["Яндекс.Директ"]);
}

#[test]
fn missing_file_keeps_previous_results() {
	let file = write_lines(&["A:/ru"]);
	let index = PlatformIndex::new();
	index.load(file.path()).unwrap();

	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("nofile.txt");
	match index.load(&missing) {
		Err(LoadError::SourceNotFound { path }) => assert_eq!(path, missing),
		other => panic!("expected SourceNotFound, got {other:?}"),
	}

	assert_eq!(index.search("/ru"), ["A"]);
	assert_eq!(index.generation(), 1);
}

#[test]
fn empty_path_is_rejected() {
	let index = PlatformIndex::new();
	assert!(matches!(index.load(""), Err(LoadError::EmptyPath)));
	assert!(matches!(index.load("   "), Err(LoadError::EmptyPath)));
}

#[test]
fn directory_is_unreadable() {
	let dir = tempfile::tempdir().unwrap();
	let index = PlatformIndex::new();
	let err = index.load(dir.path()).unwrap_err();
	assert!(matches!(err, LoadError::SourceUnreadable { .. }), "{err:?}");
	assert_eq!(err.path(), Some(dir.path()));
}

#[test]
fn file_without_valid_lines_replaces_index() {
	let index = PlatformIndex::new();
	index.load(write_lines(&["A:/ru"]).path()).unwrap();

	let report = index.load(write_lines(&["garbage", ""]).path()).unwrap();
	assert_eq!(report.accepted, 0);
	assert_eq!(report.locations, 0);
	assert!(index.search("/ru").is_empty());
	assert_eq!(index.generation(), 2);
}

#[test]
fn reloading_same_file_is_idempotent() {
	let file = write_lines(&["A:/ru", "B:/ru/svrd/revda,/ru/svrd/pervik", "C:/ru/svrd"]);
	let index = PlatformIndex::new();

	index.load(file.path()).unwrap();
	let first: Vec<_> = ["/ru", "/ru/svrd", "/ru/svrd/revda"]
		.iter()
		.map(|loc| index.search(loc))
		.collect();

	index.load(file.path()).unwrap();
	let second: Vec<_> = ["/ru", "/ru/svrd", "/ru/svrd/revda"]
		.iter()
		.map(|loc| index.search(loc))
		.collect();

	assert_eq!(first, second);
	assert_eq!(index.generation(), 2);
}

#[test]
fn byte_order_mark_is_stripped() {
	let index = PlatformIndex::new();
	let text = "\u{feff}A:/ru\r\nB:/ru/msk\r\n";
	index
		.load_reader(text.as_bytes(), Path::new("bom.txt"))
		.unwrap();
	assert_eq!(index.search("/ru/msk"), ["A", "B"]);
}

static MIXED: LazyLock<PlatformIndex> = LazyLock::new(|| {
	let index = PlatformIndex::new();
	let text = "alpha:/a\nBeta:/a/b,/İ\nZeta:/a/B/c\nÉcole:/é,/a\n::,,é//\n";
	index
		.load_reader(text.as_bytes(), Path::new("mixed.txt"))
		.expect("load mixed");
	index
});

#[test]
fn mixed_index_search() {
	assert_eq!(MIXED.search("/A/b/C"), ["alpha", "Beta", "Zeta", "École"]);
	assert_eq!(MIXED.search("/İ"), ["Beta"]);
	assert_eq!(MIXED.search(&"/İ".to_lowercase()), ["Beta"]);
	assert_eq!(MIXED.search("/É"), ["École"]);
	assert!(MIXED.search("::,,é//").is_empty());
}

proptest! {
	#[test]
	fn never_loaded_search_is_empty(location in any::<String>()) {
		prop_assert!(PlatformIndex::new().search(&location).is_empty());
	}

	#[test]
	fn loaded_search_is_sorted_for_any_text(location in "\\PC*") {
		let hits = MIXED.search(&location);
		prop_assert!(hits.windows(2).all(|w| fold(&w[0]) < fold(&w[1])), "{:?}", hits);
	}

	#[test]
	fn ascii_search_ignores_case(location in "[ -~]{0,16}") {
		let lower = MIXED.search(&location.to_lowercase());
		prop_assert_eq!(MIXED.search(&location), lower.clone());
		prop_assert_eq!(MIXED.search(&location.to_uppercase()), lower);
	}

	#[test]
	fn ascii_paths_under_a_see_ancestors(tail in "(/[a-zA-Z]{1,3}){0,4}") {
		let hits = MIXED.search(&format!("/A{tail}"));
		prop_assert!(hits.iter().any(|h| h == "alpha"));
		prop_assert!(hits.iter().any(|h| h == "École"));
	}
}
