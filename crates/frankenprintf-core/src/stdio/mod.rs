//! Formatted output.
//!
//! Implements the `printf` family over a pluggable byte sink: directive
//! parsing, value rendering and the bounded output buffer that sits between
//! them and the sink.

pub mod args;
pub mod buffer;
pub mod directive;
pub mod printf;
pub mod render;
pub mod sink;

pub use args::{Arg, ArgCursor, IntWidth};
pub use buffer::OutputBuffer;
pub use directive::{Directive, Flags, LengthModifier, Specifier, parse_directive};
pub use printf::{format_and_write, format_and_write_with, format_to_vec};
pub use sink::{Sink, WriteSink};
