//! CLI entrypoint for the frankenprintf conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frankenprintf_abi::_printf;
use frankenprintf_core::{WriteSink, format_and_write};
use frankenprintf_harness::runner;
use frankenprintf_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogLevel, validate_log_file,
};
use frankenprintf_harness::{
    ConformanceReport, FixtureArg, FixtureSet, TestRunner, VerificationSummary, demo,
};

/// Conformance tooling for frankenprintf.
#[derive(Debug, Parser)]
#[command(name = "frankenprintf-harness")]
#[command(about = "Conformance testing harness for frankenprintf")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the formatter against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown; a `.json` twin is written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Print the reference sample calls to stdout.
    Demo {
        /// Also check each line against its expected output.
        #[arg(long)]
        check: bool,
    },
    /// Format one string with the given arguments and print it.
    Render {
        /// Format string.
        #[arg(long)]
        format: String,
        /// Argument as `type:value` (char, short, int, long, ushort, uint,
        /// ulong, str, ptr) or `null`. Repeatable.
        #[arg(long = "arg")]
        args: Vec<FixtureArg>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
            timestamp,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let fixture_sets = FixtureSet::load_dir(&fixture)?;
            let runner = TestRunner::new("fixture-verify");
            let run_id = format!("run-{}", std::process::id());

            let mut results = Vec::new();
            if let Some(log_path) = &log {
                let mut emitter = LogEmitter::to_file(log_path, &runner.campaign, &run_id)?;
                emitter.emit(LogLevel::Info, "run_start")?;
                for set in &fixture_sets {
                    results.extend(runner.run_logged(set, &mut emitter)?);
                }
                runner::emit_run_end(&mut emitter, &results)?;
                emitter.flush()?;
            } else {
                for set in &fixture_sets {
                    results.extend(runner.run(set));
                }
            }

            // Stabilize report ordering for reproducible output.
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let report_doc = ConformanceReport {
                title: String::from("frankenprintf Conformance Report"),
                campaign: runner.campaign.clone(),
                timestamp: timestamp
                    .unwrap_or_else(frankenprintf_harness::structured_log::now_utc),
                summary: VerificationSummary::from_results(results),
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!("FAIL {} / {}", failure.family, failure.case_name);
                if let Some(diff) = &failure.diff {
                    eprintln!("{diff}");
                }
            }

            if let Some(report_path) = report {
                if let Some(parent) = report_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                eprintln!("Writing report to {}", report_path.display());
                let markdown = report_doc.to_markdown();
                std::fs::write(&report_path, &markdown)?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;

                let mut index = ArtifactIndex::new(&run_id, &runner.campaign);
                index.add_file(&report_path, "report_markdown")?;
                index.add_file(&json_path, "report_json")?;
                if let Some(log_path) = &log {
                    index.add_file(log_path, "log_jsonl")?;
                }
                let index_path = report_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;
                eprintln!("Wrote artifact index to {}", index_path.display());
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Demo { check } => {
            let mut mismatches = 0usize;
            for call in demo::demo_calls() {
                let args: Vec<_> = call.args.iter().map(FixtureArg::to_arg).collect();
                let rc = _printf(Some(call.format.as_bytes()), &args);
                if rc < 0 {
                    return Err(format!(
                        "{}: printf failed: {}",
                        call.name,
                        std::io::Error::last_os_error()
                    )
                    .into());
                }
                if check && rc as usize != call.expected.len() {
                    eprintln!(
                        "{}: returned {rc}, expected {}",
                        call.name,
                        call.expected.len()
                    );
                    mismatches += 1;
                }
            }
            if check {
                let results = TestRunner::new("demo").run(&demo::demo_fixture_set());
                for r in results.iter().filter(|r| !r.passed) {
                    eprintln!("{}: {}", r.case_name, r.diff.as_deref().unwrap_or(""));
                    mismatches += 1;
                }
                if mismatches > 0 {
                    return Err(format!("{mismatches} demo mismatches").into());
                }
                eprintln!("Demo output matches expectations");
            }
        }
        Command::Render { format, args } => {
            let args: Vec<_> = args.iter().map(FixtureArg::to_arg).collect();
            let mut sink = WriteSink::new(std::io::stdout().lock());
            let count = format_and_write(&mut sink, Some(format.as_bytes()), &args)?;
            eprintln!("\n[{count} bytes]");
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            if !errors.is_empty() {
                return Err(format!("{} validation errors in {lines} lines", errors.len()).into());
            }
            eprintln!("{}: {lines} valid lines", log.display());
        }
    }

    Ok(())
}
