//! Value renderers.
//!
//! Each conversion is split into a side-effect-free length computation and
//! an emission through the [`OutputBuffer`]. Width padding is always spaces
//! and always precedes the value: there is no left-justify or zero-pad mode.
//! Every `render_*` function returns the number of bytes it produced,
//! padding included.

use super::buffer::OutputBuffer;
use super::directive::{Flags, Specifier};
use super::sink::Sink;
use crate::error::SinkError;

const NULL_STR: &[u8] = b"(null)";
const NULL_PTR: &[u8] = b"(nil)";
const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

// ---------------------------------------------------------------------------
// Integer fields
// ---------------------------------------------------------------------------

/// An integer rendered into stack scratch: optional sign, optional base
/// prefix, then digits.
///
/// `scratch` holds the digits least-significant first; emission walks it in
/// reverse. 64 slots cover a `u64` in base 2.
#[derive(Debug, Clone, Copy)]
pub struct IntegerField {
    sign: Option<u8>,
    prefix: &'static [u8],
    scratch: [u8; 64],
    count: usize,
}

impl IntegerField {
    /// `%d` / `%i`.
    #[must_use]
    pub fn signed(value: i64, flags: Flags) -> Self {
        let sign = if value < 0 {
            Some(b'-')
        } else if flags.plus {
            Some(b'+')
        } else if flags.space {
            Some(b' ')
        } else {
            None
        };
        // unsigned_abs keeps i64::MIN representable.
        Self::digits(value.unsigned_abs(), 10, LOWER_DIGITS, sign, b"")
    }

    /// `%u`, `%o`, `%x`, `%X`, `%b`.
    #[must_use]
    pub fn unsigned(value: u64, specifier: Specifier, flags: Flags) -> Self {
        let (base, alphabet) = int_base(specifier);
        let prefix = if flags.alternate && value != 0 {
            alt_prefix(specifier)
        } else {
            b""
        };
        Self::digits(value, base, alphabet, None, prefix)
    }

    /// Non-null `%p`: always `0x` plus lowercase hex.
    #[must_use]
    pub fn pointer(addr: usize) -> Self {
        Self::digits(addr as u64, 16, LOWER_DIGITS, None, b"0x")
    }

    fn digits(
        mut value: u64,
        base: u64,
        alphabet: &[u8; 16],
        sign: Option<u8>,
        prefix: &'static [u8],
    ) -> Self {
        let mut scratch = [0u8; 64];
        let mut count = 0;
        loop {
            scratch[count] = alphabet[(value % base) as usize];
            count += 1;
            value /= base;
            if value == 0 {
                break;
            }
        }
        Self {
            sign,
            prefix,
            scratch,
            count,
        }
    }

    /// Natural length: sign, prefix and digits.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.sign.is_some()) + self.prefix.len() + self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit right-justified in a field of `width`.
    pub fn emit<S: Sink>(
        &self,
        out: &mut OutputBuffer<S>,
        width: usize,
    ) -> Result<usize, SinkError> {
        let natural = self.len();
        let padded = pad_to(out, width, natural)?;
        if let Some(sign) = self.sign {
            out.put(sign)?;
        }
        out.put_slice(self.prefix)?;
        for &digit in self.scratch[..self.count].iter().rev() {
            out.put(digit)?;
        }
        Ok(padded + natural)
    }
}

fn int_base(specifier: Specifier) -> (u64, &'static [u8; 16]) {
    match specifier {
        Specifier::Binary => (2, LOWER_DIGITS),
        Specifier::Octal => (8, LOWER_DIGITS),
        Specifier::HexLower => (16, LOWER_DIGITS),
        Specifier::HexUpper => (16, UPPER_DIGITS),
        _ => (10, LOWER_DIGITS),
    }
}

fn alt_prefix(specifier: Specifier) -> &'static [u8] {
    match specifier {
        Specifier::Octal => b"0",
        Specifier::HexLower => b"0x",
        Specifier::HexUpper => b"0X",
        _ => b"",
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed decimal.
pub fn render_signed<S: Sink>(
    out: &mut OutputBuffer<S>,
    value: i64,
    flags: Flags,
    width: usize,
) -> Result<usize, SinkError> {
    IntegerField::signed(value, flags).emit(out, width)
}

/// Render an unsigned value in the base `specifier` selects.
pub fn render_unsigned<S: Sink>(
    out: &mut OutputBuffer<S>,
    value: u64,
    specifier: Specifier,
    flags: Flags,
    width: usize,
) -> Result<usize, SinkError> {
    IntegerField::unsigned(value, specifier, flags).emit(out, width)
}

/// Render a pointer; null renders as `(nil)`.
pub fn render_pointer<S: Sink>(
    out: &mut OutputBuffer<S>,
    addr: usize,
    width: usize,
) -> Result<usize, SinkError> {
    if addr == 0 {
        return render_bytes(out, NULL_PTR, width);
    }
    IntegerField::pointer(addr).emit(out, width)
}

/// Render one byte.
pub fn render_char<S: Sink>(
    out: &mut OutputBuffer<S>,
    c: u8,
    width: usize,
) -> Result<usize, SinkError> {
    let padded = pad_to(out, width, 1)?;
    out.put(c)?;
    Ok(padded + 1)
}

/// Render a string verbatim; null renders as `(null)`.
pub fn render_str<S: Sink>(
    out: &mut OutputBuffer<S>,
    s: Option<&[u8]>,
    width: usize,
) -> Result<usize, SinkError> {
    render_bytes(out, s.unwrap_or(NULL_STR), width)
}

/// Render a string with non-printable bytes as `\xHH`. Width is not applied.
pub fn render_escaped<S: Sink>(
    out: &mut OutputBuffer<S>,
    s: Option<&[u8]>,
) -> Result<usize, SinkError> {
    let Some(s) = s else {
        out.put_slice(NULL_STR)?;
        return Ok(NULL_STR.len());
    };
    for &b in s {
        if is_printable(b) {
            out.put(b)?;
        } else {
            out.put_slice(&[
                b'\\',
                b'x',
                UPPER_DIGITS[usize::from(b >> 4)],
                UPPER_DIGITS[usize::from(b & 0x0f)],
            ])?;
        }
    }
    Ok(escaped_len(Some(s)))
}

/// Length of a rendered `%S` argument.
fn escaped_len(s: Option<&[u8]>) -> usize {
    match s {
        None => NULL_STR.len(),
        Some(s) => s.iter().map(|&b| if is_printable(b) { 1 } else { 4 }).sum(),
    }
}

/// Render `%%`. Width applies; flags do not.
pub fn render_percent<S: Sink>(
    out: &mut OutputBuffer<S>,
    width: usize,
) -> Result<usize, SinkError> {
    render_char(out, b'%', width)
}

/// Render an unknown specifier back as `%` plus the byte, unpadded.
pub fn render_unknown<S: Sink>(out: &mut OutputBuffer<S>, byte: u8) -> Result<usize, SinkError> {
    out.put(b'%')?;
    out.put(byte)?;
    Ok(2)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn is_printable(b: u8) -> bool {
    (32..=126).contains(&b)
}

fn render_bytes<S: Sink>(
    out: &mut OutputBuffer<S>,
    bytes: &[u8],
    width: usize,
) -> Result<usize, SinkError> {
    let padded = pad_to(out, width, bytes.len())?;
    out.put_slice(bytes)?;
    Ok(padded + bytes.len())
}

fn pad_to<S: Sink>(
    out: &mut OutputBuffer<S>,
    width: usize,
    natural: usize,
) -> Result<usize, SinkError> {
    let pad = width.saturating_sub(natural);
    out.pad(b' ', pad)?;
    Ok(pad)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
