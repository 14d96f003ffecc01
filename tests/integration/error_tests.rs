use dirmatch::compare::{compare, Comparator, CompareConfig, CompareError, UsageError};
use dirmatch::error::ExitCode;
use dirmatch::progress::{NoopSink, Phase, ProgressEvent, Side};
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_missing_left_root() {
    let right = tempdir().unwrap();
    let missing = right.path().join("nope");

    let err = compare(&missing, right.path(), None, Arc::new(NoopSink)).unwrap_err();

    assert!(matches!(
        err,
        CompareError::Usage(UsageError::MissingRoot { .. })
    ));
    assert!(err.to_string().starts_with("left folder does not exist"));
}

#[test]
fn test_file_as_root() {
    let left = tempdir().unwrap();
    let file = left.path().join("plain");
    fs::write(&file, b"x").unwrap();

    let err = compare(left.path(), &file, None, Arc::new(NoopSink)).unwrap_err();

    assert!(matches!(
        err,
        CompareError::Usage(UsageError::NotADirectory { .. })
    ));
}

#[test]
fn test_same_root_rejected() {
    let dir = tempdir().unwrap();
    let alias = dir.path().join(".");

    let err = compare(dir.path(), &alias, None, Arc::new(NoopSink)).unwrap_err();

    assert!(matches!(err, CompareError::Usage(UsageError::SameRoot(_))));
    assert!(err
        .to_string()
        .starts_with("Please select two different folders"));
}

#[test]
fn test_invalid_pattern_rejected_before_listing() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    let sink = move |_: &ProgressEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    };

    let err = compare(left.path(), right.path(), Some("(unclosed"), Arc::new(sink)).unwrap_err();

    assert!(matches!(
        err,
        CompareError::Usage(UsageError::InvalidPattern { .. })
    ));
    assert_eq!(events.load(Ordering::SeqCst), 0);
}

#[test]
fn test_usage_errors_map_to_exit_code() {
    let dir = tempdir().unwrap();
    let err = compare(dir.path(), dir.path(), None, Arc::new(NoopSink)).unwrap_err();

    assert_eq!(ExitCode::for_error(&anyhow::Error::new(err)), ExitCode::UsageError);
}

#[test]
fn test_canceled_run_returns_no_result() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::write(left.path().join("a"), b"1").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let config = CompareConfig::default().with_shutdown_flag(flag);
    let err = Comparator::new(config)
        .compare(left.path(), right.path())
        .unwrap_err();

    assert!(matches!(err, CompareError::Canceled));
    assert_eq!(
        ExitCode::for_error(&anyhow::Error::new(err)),
        ExitCode::Interrupted
    );
}

#[test]
fn test_cancel_during_hashing() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    for i in 0..10u8 {
        fs::write(left.path().join(format!("l{i}")), [i]).unwrap();
        fs::write(right.path().join(format!("r{i}")), [i + 100]).unwrap();
    }

    let flag = Arc::new(AtomicBool::new(false));
    let raise = Arc::clone(&flag);
    let hashed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hashed);
    let sink = move |event: &ProgressEvent| {
        if event.phase == Phase::Hashing {
            counter.fetch_add(1, Ordering::SeqCst);
            raise.store(true, Ordering::SeqCst);
        }
    };

    let config = CompareConfig::default()
        .with_shutdown_flag(flag)
        .with_progress(Arc::new(sink));
    let err = Comparator::new(config)
        .compare(left.path(), right.path())
        .unwrap_err();

    assert!(matches!(err, CompareError::Canceled));
    // At most the file in flight on each side
    assert!(hashed.load(Ordering::SeqCst) <= 2);
}

#[test]
fn test_failed_side_stops_other_side() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let doomed = left.path().join("vanishes.txt");
    fs::write(&doomed, b"soon gone").unwrap();
    let right_files = 1000;
    for i in 0..right_files {
        fs::write(right.path().join(format!("f{i:04}")), vec![(i % 251) as u8; 4096]).unwrap();
    }

    let right_hashed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&right_hashed);
    let sink = move |event: &ProgressEvent| match (event.phase, event.side) {
        // The left side is fully listed by the time the right listing starts.
        (Phase::Listing, Side::Right) => {
            let _ = fs::remove_file(&doomed);
        }
        (Phase::Hashing, Side::Right) => {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        _ => {}
    };

    let err = compare(left.path(), right.path(), None, Arc::new(sink)).unwrap_err();

    assert!(matches!(err, CompareError::NotFound(_)), "got {err:?}");
    assert!(right_hashed.load(Ordering::SeqCst) < right_files / 2);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_aborts() {
    use std::os::unix::fs::PermissionsExt;

    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let locked = left.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inside"), b"x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read it.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = compare(left.path(), right.path(), None, Arc::new(NoopSink));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result,
        Err(CompareError::Access { .. }) | Err(CompareError::NotFound(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts() {
    use std::os::unix::fs::PermissionsExt;

    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let file = left.path().join("secret");
    fs::write(&file, b"x").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&file).is_ok() {
        return;
    }

    let result = compare(left.path(), right.path(), None, Arc::new(NoopSink));

    assert!(matches!(result, Err(CompareError::Access { .. })));
}
