//! Conformance testing harness for frankenprintf.
//!
//! This crate provides:
//! - Fixture verify: run JSON fixture cases against the formatter
//! - Demo: the reference sample calls with their expected output
//! - Structured logging: JSONL run logs plus artifact index
//! - Report generation: human-readable + machine-readable conformance reports

#![forbid(unsafe_code)]

pub mod demo;
pub mod diff;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use fixtures::{FixtureArg, FixtureCase, FixtureSet, SinkBehavior};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
