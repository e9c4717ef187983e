//! Error types for the format engine and its sinks.

use thiserror::Error;

/// POSIX errno values surfaced through [`FormatError::errno`].
pub const EINVAL: i32 = 22;
pub const EIO: i32 = 5;
pub const EPIPE: i32 = 32;
#[cfg(any(target_os = "linux", target_os = "android", target_os = "emscripten"))]
pub const EOVERFLOW: i32 = 75;
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "emscripten")))]
pub const EOVERFLOW: i32 = 84;

/// Largest field width or output count a call may produce (`INT_MAX`).
pub const MAX_COUNT: usize = i32::MAX as usize;

/// Failure reported by an output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite { expected: usize, written: usize },
    #[error("sink closed")]
    Closed,
}

impl SinkError {
    /// errno equivalent for this failure.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::Io(err) => err.raw_os_error().unwrap_or(EIO),
            Self::ShortWrite { .. } => EIO,
            Self::Closed => EPIPE,
        }
    }
}

/// Fatal outcome of a formatting call.
///
/// Any of these aborts the call immediately. Bytes already flushed to the
/// sink stay delivered; bytes still sitting in the buffer are discarded.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format string is null")]
    NullFormat,
    #[error("truncated directive at offset {offset}")]
    TruncatedDirective { offset: usize },
    #[error("directive needs argument {index} but the list is exhausted")]
    MissingArgument { index: usize },
    #[error("argument {index} is {found}, directive expects {expected}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("directive at offset {offset} would push the output past INT_MAX bytes")]
    Overflow { offset: usize },
    #[error("sink: {0}")]
    Sink(#[from] SinkError),
}

impl FormatError {
    /// errno equivalent, for callers that report through the C convention.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::Sink(err) => err.errno(),
            Self::Overflow { .. } => EOVERFLOW,
            _ => EINVAL,
        }
    }

    /// Stable short name, used by fixtures and structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NullFormat => "null_format",
            Self::TruncatedDirective { .. } => "truncated_directive",
            Self::MissingArgument { .. } => "missing_argument",
            Self::ArgumentMismatch { .. } => "argument_mismatch",
            Self::Overflow { .. } => "overflow",
            Self::Sink(_) => "sink_failure",
        }
    }
}
