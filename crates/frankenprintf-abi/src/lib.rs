// extern "C" entry points take raw pointers from C callers and check them at
// the boundary, so per-function safety docs would only repeat that.
#![allow(clippy::missing_safety_doc)]
//! # frankenprintf-abi
//!
//! Descriptor-backed sink and C-callable entry points for the frankenprintf
//! engine.
//!
//! ```text
//! C caller -> frankenprintf_write (FpArg[]) -> Arg list -> core driver -> FdSink -> write(2)
//! Rust caller -> printf_fd / _printf ------------^
//! ```
//!
//! Failures are reported C-style: the entry point returns `-1` and stores
//! the matching errno value for the calling thread.

pub mod errno_abi;
pub mod fd_sink;
pub mod stdio_abi;

pub use fd_sink::FdSink;
pub use stdio_abi::{
    FP_ARG_CHAR, FP_ARG_INT, FP_ARG_LONG, FP_ARG_PTR, FP_ARG_SHORT, FP_ARG_STR, FP_ARG_UINT,
    FP_ARG_ULONG, FP_ARG_USHORT, FpArg, _printf, frankenprintf_write, printf_fd,
};
