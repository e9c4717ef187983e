//! Directive parser.
//!
//! Consumes one `%`-introduced directive:
//!
//! ```text
//! '%' flags* ( width | '*' ) length? specifier
//! flags     := '+' | ' ' | '#'
//! width     := digit+
//! length    := 'h' | 'l'
//! specifier := any byte
//! ```
//!
//! A `*` width pulls its value from the argument list while parsing, so the
//! width argument is consumed even if the directive later turns out to be
//! truncated or unknown. A literal width above `INT_MAX` is rejected with
//! [`FormatError::Overflow`] before anything is rendered.

use super::args::ArgCursor;
use crate::error::{FormatError, MAX_COUNT};

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// Flags parsed from a directive. Repeats are no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub plus: bool,      // '+'
    pub space: bool,     // ' '
    pub alternate: bool, // '#'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthModifier {
    #[default]
    None,
    Short, // 'h'
    Long,  // 'l'
}

/// Conversion selected by the specifier byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    Char,       // 'c'
    Str,        // 's'
    EscapedStr, // 'S'
    Percent,    // '%'
    Decimal,    // 'd'
    Integer,    // 'i'
    Binary,     // 'b'
    Unsigned,   // 'u'
    Octal,      // 'o'
    HexLower,   // 'x'
    HexUpper,   // 'X'
    Pointer,    // 'p'
    /// Anything else; rendered back literally.
    Unknown(u8),
}

impl Specifier {
    #[must_use]
    pub const fn from_byte(b: u8) -> Self {
        match b {
            b'c' => Self::Char,
            b's' => Self::Str,
            b'S' => Self::EscapedStr,
            b'%' => Self::Percent,
            b'd' => Self::Decimal,
            b'i' => Self::Integer,
            b'b' => Self::Binary,
            b'u' => Self::Unsigned,
            b'o' => Self::Octal,
            b'x' => Self::HexLower,
            b'X' => Self::HexUpper,
            b'p' => Self::Pointer,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Char => b'c',
            Self::Str => b's',
            Self::EscapedStr => b'S',
            Self::Percent => b'%',
            Self::Decimal => b'd',
            Self::Integer => b'i',
            Self::Binary => b'b',
            Self::Unsigned => b'u',
            Self::Octal => b'o',
            Self::HexLower => b'x',
            Self::HexUpper => b'X',
            Self::Pointer => b'p',
            Self::Unknown(b) => b,
        }
    }

    /// Whether the length modifier changes how this conversion fetches.
    #[must_use]
    pub const fn honors_length(self) -> bool {
        matches!(
            self,
            Self::Decimal
                | Self::Integer
                | Self::Unsigned
                | Self::Octal
                | Self::HexLower
                | Self::HexUpper
        )
    }
}

/// A fully parsed directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub flags: Flags,
    /// Minimum field width; zero means none.
    pub width: usize,
    pub length: LengthModifier,
    pub specifier: Specifier,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse the directive whose `%` sits at `fmt[percent_at]`.
///
/// Returns the directive and the index of the first byte after it. A format
/// that ends before the specifier byte yields
/// [`FormatError::TruncatedDirective`]; a literal width above `INT_MAX`
/// yields [`FormatError::Overflow`].
pub fn parse_directive(
    fmt: &[u8],
    percent_at: usize,
    args: &mut ArgCursor<'_, '_>,
) -> Result<(Directive, usize), FormatError> {
    debug_assert_eq!(fmt.get(percent_at), Some(&b'%'));
    let len = fmt.len();
    let mut pos = percent_at + 1;

    // --- flags ---
    let mut flags = Flags::default();
    while pos < len {
        match fmt[pos] {
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'#' => flags.alternate = true,
            _ => break,
        }
        pos += 1;
    }

    // --- width ---
    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        args.width()?
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        parse_width(&fmt[start..pos]).ok_or(FormatError::Overflow { offset: percent_at })?
    };

    // --- length modifier ---
    let length = match fmt.get(pos) {
        Some(b'h') => {
            pos += 1;
            LengthModifier::Short
        }
        Some(b'l') => {
            pos += 1;
            LengthModifier::Long
        }
        _ => LengthModifier::None,
    };

    // --- specifier ---
    let Some(&byte) = fmt.get(pos) else {
        return Err(FormatError::TruncatedDirective { offset: percent_at });
    };

    Ok((
        Directive {
            flags,
            width,
            length,
            specifier: Specifier::from_byte(byte),
        },
        pos + 1,
    ))
}

/// Decimal width, or `None` once it passes `MAX_COUNT`.
fn parse_width(digits: &[u8]) -> Option<usize> {
    let mut result = 0_usize;
    for &d in digits {
        result = result.checked_mul(10)?.checked_add(usize::from(d - b'0'))?;
        if result > MAX_COUNT {
            return None;
        }
    }
    Some(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
