//! # frankenprintf-core
//!
//! Safe Rust implementation of a `printf`-family formatted output routine.
//!
//! The crate interprets a byte format string against a statically typed
//! argument list and streams the rendered bytes through a bounded buffer into
//! a caller-supplied [`Sink`](stdio::Sink). No `unsafe` code is permitted at
//! the crate level; OS write primitives live in `frankenprintf-abi`.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod stdio;

pub use config::{PrintfConfig, printf_config};
pub use error::{FormatError, SinkError};
pub use stdio::{
    Arg, IntWidth, Sink, WriteSink, format_and_write, format_and_write_with, format_to_vec,
};
