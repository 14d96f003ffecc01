use dirmatch::compare::{compare, ComparisonResult};
use dirmatch::progress::NoopSink;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn all_paths(result: &ComparisonResult) -> Vec<String> {
    let mut paths = Vec::new();
    for pair in &result.common {
        paths.push(pair.left.path.to_string_lossy().into_owned());
        paths.push(pair.right.path.to_string_lossy().into_owned());
    }
    for (_, f) in result.left_only.iter().chain(&result.right_only) {
        paths.push(f.path.to_string_lossy().into_owned());
    }
    for d in result.duplicates_left.iter().chain(&result.duplicates_right) {
        paths.push(d.canonical.path.to_string_lossy().into_owned());
        paths.push(d.duplicate.path.to_string_lossy().into_owned());
    }
    paths
}

#[test]
fn test_filter_excludes_from_every_collection() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    // .tmp files that would otherwise be common, unique and duplicates
    write(left.path(), "keep.txt", b"keep");
    write(left.path(), "a.tmp", b"keep");
    write(left.path(), "b.tmp", b"only-left-tmp");
    write(left.path(), "sub/c.tmp", b"shared-tmp");
    write(right.path(), "keep.txt", b"keep");
    write(right.path(), "d.tmp", b"shared-tmp");
    write(right.path(), "e.tmp", b"only-right-tmp");

    let result = compare(
        left.path(),
        right.path(),
        Some(r"\.tmp$"),
        Arc::new(NoopSink),
    )
    .unwrap();

    assert!(all_paths(&result).iter().all(|p| !p.ends_with(".tmp")));
    assert_eq!(result.common.len(), 1);
    assert!(result.left_only.is_empty());
    assert!(result.right_only.is_empty());
    assert!(result.duplicates_left.is_empty());
    assert_eq!(result.summary.left_filtered, 3);
    assert_eq!(result.summary.right_filtered, 2);
}

#[test]
fn test_filter_matches_anywhere_in_full_path() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "cache/blob", b"x");
    write(left.path(), "data/blob", b"y");

    let result = compare(
        left.path(),
        right.path(),
        Some("cache"),
        Arc::new(NoopSink),
    )
    .unwrap();

    assert_eq!(result.left_only.len(), 1);
    assert!(result.left_only[0].1.path.ends_with("data/blob"));
}

#[test]
fn test_empty_pattern_filters_nothing() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a", b"1");

    let result = compare(left.path(), right.path(), Some(""), Arc::new(NoopSink)).unwrap();

    assert_eq!(result.left_only.len(), 1);
    assert_eq!(result.summary.left_filtered, 0);
}

#[test]
fn test_filter_everything() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a", b"1");
    write(right.path(), "b", b"2");

    let result = compare(left.path(), right.path(), Some("."), Arc::new(NoopSink)).unwrap();

    assert!(result.is_empty());
}
