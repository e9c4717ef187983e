//! Integration test: conformance fixture suite
//!
//! Validates that:
//! 1. Every fixture file under tests/conformance/fixtures loads.
//! 2. Every case passes against the formatter.
//! 3. The demo fixture file matches the built-in sample table.
//! 4. A logged run produces a valid JSONL log with one start/result pair per case.
//! 5. Reports and artifact index are consistent.
//!
//! Run: cargo test -p frankenprintf-harness --test fixture_suite_test

use std::path::{Path, PathBuf};

use frankenprintf_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogLevel, sha256_hex, validate_log_file,
};
use frankenprintf_harness::{
    ConformanceReport, FixtureSet, TestRunner, VerificationSummary, demo, runner,
};

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture_dir() -> PathBuf {
    workspace_root().join("tests/conformance/fixtures")
}

fn load_all() -> Vec<FixtureSet> {
    FixtureSet::load_dir(&fixture_dir()).expect("fixture directory should load")
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "frankenprintf-harness-{tag}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn fixture_files_load_with_unique_names() {
    let sets = load_all();
    let families: Vec<&str> = sets.iter().map(|s| s.family.as_str()).collect();
    for family in ["printf/core", "printf/errors", "printf/demo"] {
        assert!(families.contains(&family), "missing family {family}");
    }
    for set in &sets {
        assert_eq!(set.version, "v1", "{}", set.family);
        assert!(!set.cases.is_empty(), "{} has no cases", set.family);
        let mut names: Vec<&str> = set.cases.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len(), "duplicate case names in {}", set.family);
    }
}

#[test]
fn every_fixture_case_passes() {
    let runner = TestRunner::new("suite");
    let mut results = Vec::new();
    for set in &load_all() {
        results.extend(runner.run(set));
    }
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<String> = summary
        .failures()
        .map(|r| format!("{}/{}:\n{}", r.family, r.case_name, r.diff.as_deref().unwrap_or("")))
        .collect();
    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n\n"));
    assert!(summary.total >= 50, "suite unexpectedly small: {}", summary.total);
}

#[test]
fn error_cases_declare_an_error_kind() {
    let known = [
        "null_format",
        "truncated_directive",
        "missing_argument",
        "argument_mismatch",
        "overflow",
        "sink_failure",
    ];
    for set in &load_all() {
        for case in &set.cases {
            if let Some(kind) = &case.expected_error {
                assert!(known.contains(&kind.as_str()), "{}: unknown kind {kind}", case.name);
                assert!(
                    case.expected_count.is_none(),
                    "{}: failing calls return no count",
                    case.name
                );
            }
        }
    }
}

#[test]
fn demo_file_matches_builtin_table() {
    let on_disk = FixtureSet::from_file(&fixture_dir().join("printf_demo.json")).unwrap();
    let builtin = demo::demo_fixture_set();
    assert_eq!(on_disk.family, builtin.family);
    assert_eq!(on_disk.cases.len(), builtin.cases.len());
    for (disk, table) in on_disk.cases.iter().zip(&builtin.cases) {
        assert_eq!(disk.name, table.name);
        assert_eq!(disk.format, table.format);
        assert_eq!(disk.args, table.args);
        assert_eq!(disk.expected_output, table.expected_output);
        assert_eq!(disk.expected_count, table.expected_count);
    }
}

#[test]
fn logged_run_produces_valid_jsonl() {
    let dir = scratch_dir("log");
    let log_path = dir.join("run.log.jsonl");
    let sets = load_all();
    let total_cases: usize = sets.iter().map(|s| s.cases.len()).sum();

    let runner = TestRunner::new("suite");
    let mut emitter = LogEmitter::to_file(&log_path, "suite", "run-test").unwrap();
    emitter.emit(LogLevel::Info, "run_start").unwrap();
    let mut all = Vec::new();
    for set in &sets {
        let results = runner.run_logged(set, &mut emitter).unwrap();
        assert!(results.iter().all(|r| r.passed));
        all.extend(results);
    }
    runner::emit_run_end(&mut emitter, &all).unwrap();
    emitter.flush().unwrap();
    drop(emitter);

    let (lines, errors) = validate_log_file(&log_path).unwrap();
    assert!(errors.is_empty(), "log errors: {errors:?}");
    assert_eq!(lines, 2 * total_cases + 2);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let results: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .filter(|v| v["event"] == "case_result")
        .collect();
    assert_eq!(results.len(), total_cases);
    for entry in &results {
        assert_eq!(entry["outcome"], "pass");
        assert!(entry["latency_ns"].is_u64());
        assert!(entry["details"]["sink_calls"].is_u64());
        // Exactly one of byte_count (success) or errno (failure).
        assert_ne!(entry.get("byte_count").is_some(), entry.get("errno").is_some());
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn report_and_artifact_index_agree() {
    let mut results = Vec::new();
    let runner = TestRunner::new("suite");
    for set in &load_all() {
        results.extend(runner.run(set));
    }
    let report = ConformanceReport {
        title: "frankenprintf Conformance Report".into(),
        campaign: runner.campaign.clone(),
        timestamp: "2026-01-01T00:00:00.000Z".into(),
        summary: VerificationSummary::from_results(results),
    };
    let md = report.to_markdown();
    assert!(md.contains("- Failed: 0"));
    assert!(!md.contains("## Failures"));

    let dir = scratch_dir("report");
    let md_path = dir.join("report.md");
    std::fs::write(&md_path, &md).unwrap();
    let mut index = ArtifactIndex::new("run-test", "suite");
    index.add_file(&md_path, "report_markdown").unwrap();
    assert_eq!(index.artifacts[0].sha256, sha256_hex(md.as_bytes()));
    assert_eq!(index.artifacts[0].size_bytes, Some(md.len() as u64));

    std::fs::remove_dir_all(&dir).ok();
}
