//! printf format driver.
//!
//! Walks the format string once, copying literal runs into the output buffer
//! and handing each `%` to the directive parser. The parsed directive pulls
//! its argument from the typed list and is rendered straight into the same
//! buffer, so no intermediate string is ever built.
//!
//! The count is capped at `INT_MAX`: a literal run, or a directive whose
//! field width alone would pass it, fails with [`FormatError::Overflow`]
//! before any of its bytes are emitted.
//!
//! On success the buffer is flushed once more and the logical byte count is
//! returned. On any error the call returns immediately: bytes already flushed
//! stay delivered, the buffered tail is dropped unwritten.

use super::args::{Arg, ArgCursor};
use super::buffer::OutputBuffer;
use super::directive::{Directive, LengthModifier, Specifier, parse_directive};
use super::render;
use super::sink::Sink;
use crate::config::{PrintfConfig, printf_config};
use crate::error::{FormatError, MAX_COUNT};

/// Format `args` according to `format` and write the result to `sink`,
/// using the process configuration.
///
/// `format == None` fails with [`FormatError::NullFormat`] before touching
/// the sink.
pub fn format_and_write<S: Sink + ?Sized>(
    sink: &mut S,
    format: Option<&[u8]>,
    args: &[Arg<'_>],
) -> Result<usize, FormatError> {
    format_and_write_with(&printf_config(), sink, format, args)
}

/// [`format_and_write`] with an explicit configuration.
pub fn format_and_write_with<S: Sink + ?Sized>(
    config: &PrintfConfig,
    sink: &mut S,
    format: Option<&[u8]>,
    args: &[Arg<'_>],
) -> Result<usize, FormatError> {
    let fmt = format.ok_or(FormatError::NullFormat)?;
    let mut out = OutputBuffer::new(sink, config.buffer_capacity);
    let mut cursor = ArgCursor::new(args);
    let mut count = 0usize;
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        // Literal run up to the next '%'.
        let start = pos;
        while pos < len && fmt[pos] != b'%' {
            pos += 1;
        }
        if pos > start {
            count = add_count(count, pos - start, start)?;
            out.put_slice(&fmt[start..pos])?;
        }
        if pos >= len {
            break;
        }

        let (directive, next) = parse_directive(fmt, pos, &mut cursor)?;
        add_count(count, directive.width, pos)?;
        let written = render_directive(&mut out, &directive, &mut cursor)?;
        count = add_count(count, written, pos)?;
        pos = next;
    }

    out.flush()?;
    Ok(count)
}

/// Format into a fresh `Vec<u8>`.
pub fn format_to_vec(format: &[u8], args: &[Arg<'_>]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::with_capacity(format.len() + 16);
    format_and_write(&mut out, Some(format), args)?;
    Ok(out)
}

fn add_count(count: usize, n: usize, offset: usize) -> Result<usize, FormatError> {
    count
        .checked_add(n)
        .filter(|&total| total <= MAX_COUNT)
        .ok_or(FormatError::Overflow { offset })
}

fn render_directive<S: Sink>(
    out: &mut OutputBuffer<S>,
    directive: &Directive,
    args: &mut ArgCursor<'_, '_>,
) -> Result<usize, FormatError> {
    let Directive {
        flags,
        width,
        length,
        specifier,
    } = *directive;

    let written = match specifier {
        Specifier::Char => render::render_char(out, args.char()?, width)?,
        Specifier::Str => render::render_str(out, args.string()?, width)?,
        Specifier::EscapedStr => render::render_escaped(out, args.string()?)?,
        Specifier::Percent => render::render_percent(out, width)?,
        Specifier::Decimal | Specifier::Integer => {
            render::render_signed(out, args.signed(length)?, flags, width)?
        }
        Specifier::Unsigned | Specifier::Octal | Specifier::HexLower | Specifier::HexUpper => {
            render::render_unsigned(out, args.unsigned(length)?, specifier, flags, width)?
        }
        Specifier::Binary => {
            let value = args.unsigned(LengthModifier::None)?;
            render::render_unsigned(out, value, specifier, flags, width)?
        }
        Specifier::Pointer => render::render_pointer(out, args.pointer()?, width)?,
        Specifier::Unknown(byte) => render::render_unknown(out, byte)?,
    };
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
