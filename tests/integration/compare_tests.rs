use dirmatch::compare::{compare, Comparator, ComparisonResult, CompareConfig};
use dirmatch::progress::NoopSink;
use dirmatch::scanner::Fingerprint;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Canonical root, matching the paths the comparison reports.
fn root(dir: &TempDir) -> PathBuf {
    dir.path().canonicalize().unwrap()
}

fn run(left: &TempDir, right: &TempDir) -> ComparisonResult {
    compare(left.path(), right.path(), None, Arc::new(NoopSink)).unwrap()
}

#[test]
fn test_single_identical_file() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "file.bin", b"same bytes");
    write(right.path(), "file.bin", b"same bytes");

    let result = run(&left, &right);

    assert_eq!(result.common.len(), 1);
    assert!(result.left_only.is_empty());
    assert!(result.right_only.is_empty());
    assert!(result.is_identical());
}

#[test]
fn test_match_by_content_not_name() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a.txt", b"hi");
    write(right.path(), "b.txt", b"hi");

    let result = run(&left, &right);

    assert_eq!(result.common.len(), 1);
    assert_eq!(result.common[0].left.path, root(&left).join("a.txt"));
    assert_eq!(result.common[0].right.path, root(&right).join("b.txt"));
    assert_eq!(result.common[0].fingerprint, Fingerprint::of_bytes(b"hi"));
}

#[test]
fn test_match_across_subdirectories() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "deep/er/x.dat", b"payload");
    write(right.path(), "y.dat", b"payload");

    let result = run(&left, &right);

    assert_eq!(result.common.len(), 1);
    assert_eq!(
        result.common[0].left.path,
        root(&left).join("deep").join("er").join("x.dat")
    );
}

#[test]
fn test_same_side_duplicates_are_not_unique_or_common() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a.txt", b"hi");
    write(left.path(), "b.txt", b"hi");
    write(right.path(), "c.txt", b"hi");

    let result = run(&left, &right);

    assert_eq!(result.duplicates_left.len(), 1);
    assert_eq!(
        result.duplicates_left[0].canonical.path,
        root(&left).join("a.txt")
    );
    assert_eq!(
        result.duplicates_left[0].duplicate.path,
        root(&left).join("b.txt")
    );
    assert_eq!(result.common.len(), 1);
    assert_eq!(result.common[0].left.path, root(&left).join("a.txt"));
    assert_eq!(result.common[0].right.path, root(&right).join("c.txt"));
    assert!(result.left_only.is_empty());
    assert!(result.right_only.is_empty());
    assert!(result.duplicates_right.is_empty());
}

#[test]
fn test_unique_files_each_side() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "shared", b"shared");
    write(left.path(), "only-left", b"L");
    write(right.path(), "shared", b"shared");
    write(right.path(), "only-right", b"R");

    let result = run(&left, &right);

    assert_eq!(result.common.len(), 1);
    assert_eq!(result.left_only.len(), 1);
    assert_eq!(result.left_only[0].1.path, root(&left).join("only-left"));
    assert_eq!(result.right_only.len(), 1);
    assert_eq!(result.right_only[0].1.path, root(&right).join("only-right"));
    assert!(!result.is_identical());
}

#[test]
fn test_empty_directories() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();

    let result = run(&left, &right);

    assert!(result.is_empty());
    assert!(result.is_identical());
}

#[test]
fn test_empty_files_match_each_other() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "empty1", b"");
    write(left.path(), "empty2", b"");
    write(right.path(), "nothing", b"");

    let result = run(&left, &right);

    assert_eq!(result.common.len(), 1);
    assert_eq!(result.duplicates_left.len(), 1);
}

#[test]
fn test_hidden_files_are_compared() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), ".hidden", b"secret");

    let result = run(&left, &right);

    assert_eq!(result.left_only.len(), 1);
}

#[test]
fn test_idempotent() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a", b"1");
    write(left.path(), "b", b"1");
    write(left.path(), "sub/c", b"2");
    write(right.path(), "d", b"2");
    write(right.path(), "e", b"3");

    let first = run(&left, &right);
    let second = run(&left, &right);

    let lines = |r: &ComparisonResult| -> Vec<String> {
        r.classifications().iter().map(|c| c.display()).collect()
    };
    assert_eq!(lines(&first), lines(&second));
}

#[test]
fn test_partition_is_disjoint() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    for i in 0..20u8 {
        write(left.path(), &format!("l{i}"), &[i % 7]);
        write(right.path(), &format!("r{i}"), &[i % 5 + 3]);
    }

    let result = run(&left, &right);

    let mut seen = HashSet::new();
    for fp in result
        .common
        .iter()
        .map(|p| p.fingerprint)
        .chain(result.left_only.iter().map(|(fp, _)| *fp))
        .chain(result.right_only.iter().map(|(fp, _)| *fp))
    {
        assert!(seen.insert(fp), "fingerprint {fp} classified twice");
    }
    // 0..7 on the left, 3..8 on the right
    assert_eq!(result.common.len(), 4);
    assert_eq!(result.left_only.len(), 3);
    assert_eq!(result.right_only.len(), 1);
    assert_eq!(result.duplicates_left.len(), 13);
    assert_eq!(result.duplicates_right.len(), 15);
}

#[test]
fn test_summary_counts() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write(left.path(), "a", b"abc");
    write(right.path(), "b", b"abcd");

    let result = Comparator::with_defaults()
        .compare(left.path(), right.path())
        .unwrap();

    assert_eq!(result.summary.left_listed, 1);
    assert_eq!(result.summary.right_listed, 1);
    assert_eq!(result.summary.left_filtered, 0);
    assert_eq!(result.summary.bytes_hashed, 7);
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_unless_followed() {
    use dirmatch::scanner::WalkerConfig;

    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let outside = tempdir().unwrap();
    write(outside.path(), "target", b"linked");
    std::os::unix::fs::symlink(outside.path().join("target"), left.path().join("link")).unwrap();

    let result = run(&left, &right);
    assert!(result.is_empty());

    let config = CompareConfig::default().with_walker_config(WalkerConfig::new(true));
    let result = Comparator::new(config)
        .compare(left.path(), right.path())
        .unwrap();
    assert_eq!(result.left_only.len(), 1);
}
