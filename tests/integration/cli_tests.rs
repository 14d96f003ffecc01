use clap::Parser;
use dirmatch::cli::Cli;
use dirmatch::error::ExitCode;
use dirmatch::run_app;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["dirmatch", "-q", "--no-color"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn setup() -> (TempDir, TempDir, TempDir) {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::write(left.path().join("a.txt"), b"hi").unwrap();
    fs::write(left.path().join("b.txt"), b"hi").unwrap();
    fs::write(left.path().join("x.bin"), b"left only").unwrap();
    fs::write(right.path().join("c.txt"), b"hi").unwrap();
    (left, right, tempdir().unwrap())
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_json_report_to_file() {
    let (left, right, out) = setup();
    let report = out.path().join("report.json");
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "-o",
        "json",
        "--output-file",
        s(&report),
        "--no-progress",
    ]);

    let code = run_app(cli).unwrap();
    assert_eq!(code, ExitCode::Success);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["common"].as_array().unwrap().len(), 1);
    assert_eq!(value["left_only"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates_left"].as_array().unwrap().len(), 1);
    assert_eq!(value["summary"]["exit_code"], 0);
}

#[test]
fn test_csv_report_respects_show() {
    let (left, right, out) = setup();
    let report = out.path().join("report.csv");
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "-o",
        "csv",
        "--show",
        "duplicates",
        "--output-file",
        s(&report),
        "--no-progress",
    ]);

    run_app(cli).unwrap();

    let csv = fs::read_to_string(&report).unwrap();
    let rows: Vec<_> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("duplicate,left,"));
}

#[test]
fn test_text_report_default_shows_unique() {
    let (left, right, out) = setup();
    let report = out.path().join("report.txt");
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "--output-file",
        s(&report),
        "--no-progress",
    ]);

    run_app(cli).unwrap();

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.lines().next().unwrap().starts_with("U  "));
    assert!(text.contains("x.bin  (left)"));
    assert!(!text.contains("C  "));
}

#[test]
fn test_identical_trees_exit_code() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(left.path().join("one"), b"same").unwrap();
    fs::write(left.path().join("two"), b"same").unwrap();
    fs::write(right.path().join("three"), b"same").unwrap();

    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "--output-file",
        s(&out.path().join("r.txt")),
        "--no-progress",
    ]);

    assert_eq!(run_app(cli).unwrap(), ExitCode::Identical);
}

#[test]
fn test_ignore_flag_applies_to_both_sides() {
    let (left, right, out) = setup();
    let report = out.path().join("report.json");
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "-i",
        r"\.bin$",
        "-o",
        "json",
        "--output-file",
        s(&report),
        "--no-progress",
    ]);

    assert_eq!(run_app(cli).unwrap(), ExitCode::Identical);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["summary"]["left_filtered"], 1);
}

#[test]
fn test_bad_pattern_is_usage_error() {
    let (left, right, _out) = setup();
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(right.path()),
        "-i",
        "[",
        "--no-progress",
    ]);

    let err = run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::UsageError);
}

#[test]
fn test_missing_root_is_usage_error() {
    let (left, _right, _out) = setup();
    let missing = left.path().join("missing");
    let cli = parse(&[
        "compare",
        s(left.path()),
        s(&missing),
        "--no-progress",
    ]);

    let err = run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::UsageError);
    assert!(err.to_string().contains("right folder does not exist"));
}

#[test]
fn test_explicit_config_file() {
    let (left, right, out) = setup();
    let config = out.path().join("dirmatch.toml");
    fs::write(&config, "output = \"json\"\nprogress = false\n").unwrap();
    let report = out.path().join("report.out");

    let cli = parse(&[
        "--config",
        s(&config),
        "compare",
        s(left.path()),
        s(right.path()),
        "--output-file",
        s(&report),
    ]);

    run_app(cli).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert!(value["common"].is_array());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let out = tempdir().unwrap();
    let cli = parse(&["--config", s(&out.path().join("absent.toml")), "config"]);

    let err = run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}
