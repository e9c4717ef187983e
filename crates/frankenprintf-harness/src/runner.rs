//! Test execution engine.
//!
//! Each case runs against the core driver with a [`ScriptedSink`] that
//! records every byte it accepts and can be told to fail or short-write
//! after a number of calls. The case passes when the recorded bytes, the
//! error kind and (if given) the returned count all match.

use std::time::Instant;

use frankenprintf_core::{
    FormatError, PrintfConfig, Sink, SinkError, format_and_write_with, printf_config,
};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet, SinkBehavior};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationResult;

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

/// Sink that records accepted bytes and follows a [`SinkBehavior`] script.
#[derive(Debug, Default)]
pub struct ScriptedSink {
    delivered: Vec<u8>,
    calls: usize,
    behavior: SinkBehavior,
}

impl ScriptedSink {
    #[must_use]
    pub fn new(behavior: SinkBehavior) -> Self {
        Self {
            delivered: Vec::new(),
            calls: 0,
            behavior,
        }
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn delivered(&self) -> &[u8] {
        &self.delivered
    }

    /// Number of `write` calls received, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Sink for ScriptedSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        let call = self.calls;
        self.calls += 1;
        match self.behavior {
            SinkBehavior::FailAfter { writes } if call >= writes => Err(SinkError::Closed),
            SinkBehavior::ShortAfter { writes } if call >= writes => {
                let n = bytes.len() / 2;
                self.delivered.extend_from_slice(&bytes[..n]);
                Ok(n)
            }
            _ => {
                self.delivered.extend_from_slice(bytes);
                Ok(bytes.len())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Case execution
// ---------------------------------------------------------------------------

/// Raw observations from running one case.
#[derive(Debug)]
pub struct CaseExecution {
    pub result: Result<usize, FormatError>,
    pub delivered: Vec<u8>,
    pub sink_calls: usize,
    pub latency_ns: u64,
}

/// Run one case against the core driver.
#[must_use]
pub fn execute_case(case: &FixtureCase) -> CaseExecution {
    let config = case
        .buffer_capacity
        .map_or_else(printf_config, PrintfConfig::with_capacity);
    let args = case.core_args();
    let mut sink = ScriptedSink::new(case.sink);

    let start = Instant::now();
    let result = format_and_write_with(
        &config,
        &mut sink,
        case.format.as_deref().map(str::as_bytes),
        &args,
    );
    let latency_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    CaseExecution {
        result,
        sink_calls: sink.calls(),
        delivered: sink.delivered,
        latency_ns,
    }
}

/// Compare an execution against the case's expectations.
#[must_use]
pub fn evaluate(family: &str, case: &FixtureCase, run: &CaseExecution) -> VerificationResult {
    let actual = String::from_utf8_lossy(&run.delivered).into_owned();
    let actual_error = run.result.as_ref().err().map(|e| e.kind().to_string());
    let count = run.result.as_ref().ok().copied();

    let mut notes = Vec::new();
    if actual != case.expected_output {
        notes.push(diff::render_diff(&case.expected_output, &actual));
    }
    if actual_error != case.expected_error {
        notes.push(format!(
            "error: expected {}, got {}",
            case.expected_error.as_deref().unwrap_or("success"),
            match &run.result {
                Ok(_) => String::from("success"),
                Err(e) => format!("{} ({e})", e.kind()),
            }
        ));
    }
    if let Some(expected) = case.expected_count
        && count != Some(expected)
    {
        notes.push(format!("count: expected {expected}, got {count:?}"));
    }
    // With a well-behaved sink the count is exactly what was delivered.
    if case.sink == SinkBehavior::Ok
        && let Some(n) = count
        && n != run.delivered.len()
    {
        notes.push(format!(
            "count {n} disagrees with {} delivered bytes",
            run.delivered.len()
        ));
    }

    VerificationResult {
        case_name: case.name.clone(),
        family: family.to_string(),
        format: case.format.clone(),
        passed: notes.is_empty(),
        expected: case.expected_output.clone(),
        actual,
        expected_error: case.expected_error.clone(),
        actual_error,
        count,
        diff: if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n"))
        },
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs fixture sets and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all cases in a set.
    #[must_use]
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| evaluate(&fixture_set.family, case, &execute_case(case)))
            .collect()
    }

    /// Run all cases in a set, emitting `case_start` / `case_result` entries.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let family = fixture_set.family.as_str();
        let mut results = Vec::with_capacity(fixture_set.cases.len());
        for case in &fixture_set.cases {
            log.emit_entry(
                LogEntry::new("", LogLevel::Debug, "case_start")
                    .with_campaign(&self.campaign)
                    .with_case(family, &case.name)
                    .with_format(case.format.as_deref()),
            )?;

            let run = execute_case(case);
            let result = evaluate(family, case, &run);

            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, "case_result")
                .with_campaign(&self.campaign)
                .with_case(family, &case.name)
                .with_format(case.format.as_deref())
                .with_outcome(outcome)
                .with_latency_ns(run.latency_ns)
                .with_details(serde_json::json!({
                    "sink_calls": run.sink_calls,
                    "delivered_bytes": run.delivered.len(),
                    "error": result.actual_error,
                    "diff": result.diff,
                }));
            match &run.result {
                Ok(n) => entry = entry.with_byte_count(*n),
                Err(e) => entry = entry.with_errno(e.errno()),
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }
}

/// Emit the closing `run_end` entry: `info` when every case passed, `warn`
/// otherwise, with the pass/fail tally in `details`.
pub fn emit_run_end(log: &mut LogEmitter, results: &[VerificationResult]) -> std::io::Result<()> {
    let failed = results.iter().filter(|r| !r.passed).count();
    let level = if failed == 0 {
        LogLevel::Info
    } else {
        LogLevel::Warn
    };
    log.emit_entry(LogEntry::new("", level, "run_end").with_details(serde_json::json!({
        "total": results.len(),
        "passed": results.len() - failed,
        "failed": failed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cases: &str) -> FixtureSet {
        FixtureSet::from_json(&format!(
            r#"{{"version":"v1","family":"printf/unit","cases":[{cases}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn passing_case() {
        let fixture = set(
            r#"{"name":"hex","format":"|%#8x|","args":[{"type":"uint","value":42}],
                "expected_output":"|    0x2a|","expected_count":10}"#,
        );
        let results = TestRunner::new("unit").run(&fixture);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].diff);
        assert_eq!(results[0].count, Some(10));
        assert_eq!(results[0].family, "printf/unit");
    }

    #[test]
    fn output_mismatch_fails_with_diff() {
        let fixture = set(
            r#"{"name":"wrong","format":"%d","args":[{"type":"int","value":5}],
                "expected_output":"6"}"#,
        );
        let results = TestRunner::new("unit").run(&fixture);
        assert!(!results[0].passed);
        assert!(results[0].diff.as_deref().unwrap().contains("-6"));
    }

    #[test]
    fn expected_error_kind_is_checked() {
        let fixture = set(
            r#"{"name":"trunc","format":"ab%","expected_error":"truncated_directive"},
               {"name":"null","format":null,"expected_error":"null_format"},
               {"name":"wrong_kind","format":"%s","args":[{"type":"int","value":1}],
                "expected_error":"missing_argument"}"#,
        );
        let results = TestRunner::new("unit").run(&fixture);
        assert!(results[0].passed, "{:?}", results[0].diff);
        assert!(results[1].passed, "{:?}", results[1].diff);
        assert!(!results[2].passed);
        assert_eq!(results[2].actual_error.as_deref(), Some("argument_mismatch"));
    }

    #[test]
    fn failing_sink_keeps_earlier_flushes() {
        let fixture = set(
            r#"{"name":"fail","format":"abcdef","buffer_capacity":2,
                "sink":{"mode":"fail_after","writes":2},
                "expected_output":"abcd","expected_error":"sink_failure"}"#,
        );
        let results = TestRunner::new("unit").run(&fixture);
        assert!(results[0].passed, "{:?}", results[0].diff);
    }

    #[test]
    fn short_write_is_a_sink_failure() {
        let case = &set(
            r#"{"name":"short","format":"abcd","buffer_capacity":4,
                "sink":{"mode":"short_after","writes":0},
                "expected_output":"ab","expected_error":"sink_failure"}"#,
        )
        .cases[0];
        let run = execute_case(case);
        assert_eq!(run.sink_calls, 1);
        assert!(matches!(
            run.result,
            Err(FormatError::Sink(SinkError::ShortWrite {
                expected: 4,
                written: 2
            }))
        ));
        assert!(evaluate("printf/unit", case, &run).passed);
    }

    #[test]
    fn run_end_warns_on_failures() {
        use std::cell::RefCell;
        use std::io::Write;
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct Shared(Rc<RefCell<Vec<u8>>>);

        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let fixture = set(
            r#"{"name":"ok","format":"x","expected_output":"x"},
               {"name":"bad","format":"x","expected_output":"y"}"#,
        );
        let results = TestRunner::new("unit").run(&fixture);
        let buf = Shared::default();
        let mut log = LogEmitter::to_writer(buf.clone(), "unit", "run-1");
        emit_run_end(&mut log, &results).unwrap();
        emit_run_end(&mut log, &results[..1]).unwrap();
        log.flush().unwrap();

        let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["level"], "warn");
        assert_eq!(lines[0]["details"]["failed"], 1);
        assert_eq!(lines[1]["level"], "info");
        assert_eq!(lines[1]["details"]["passed"], 1);
    }

    #[test]
    fn logged_run_emits_start_and_result() {
        let fixture = set(
            r#"{"name":"a","format":"x","expected_output":"x"},
               {"name":"b","format":"%","expected_output":"","expected_error":"truncated_directive"}"#,
        );
        let mut log = LogEmitter::to_buffer("unit", "run-1");
        let results = TestRunner::new("unit").run_logged(&fixture, &mut log).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
    }
}
