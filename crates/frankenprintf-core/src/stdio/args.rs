//! Typed argument list.
//!
//! Callers build an ordered slice of [`Arg`] values; directives consume them
//! positionally through an [`ArgCursor`]. Integer values are stored widened
//! to 64 bits and narrowed again by the consuming directive's length
//! modifier, so `%x` of `Arg::int(-1)` reads `ffffffff` exactly as a native
//! formatter would.

use super::directive::LengthModifier;
use crate::error::FormatError;

/// Source width of an integer argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Short,
    Int,
    Long,
}

/// One formatting argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Char(u8),
    /// `None` models a null string pointer.
    Str(Option<&'a [u8]>),
    Signed { value: i64, width: IntWidth },
    Unsigned { value: u64, width: IntWidth },
    /// Address value; zero is the null pointer.
    Pointer(usize),
}

impl<'a> Arg<'a> {
    pub const fn char(c: u8) -> Self {
        Self::Char(c)
    }

    pub const fn short(value: i16) -> Self {
        Self::Signed {
            value: value as i64,
            width: IntWidth::Short,
        }
    }

    pub const fn int(value: i32) -> Self {
        Self::Signed {
            value: value as i64,
            width: IntWidth::Int,
        }
    }

    pub const fn long(value: i64) -> Self {
        Self::Signed {
            value,
            width: IntWidth::Long,
        }
    }

    pub const fn ushort(value: u16) -> Self {
        Self::Unsigned {
            value: value as u64,
            width: IntWidth::Short,
        }
    }

    pub const fn uint(value: u32) -> Self {
        Self::Unsigned {
            value: value as u64,
            width: IntWidth::Int,
        }
    }

    pub const fn ulong(value: u64) -> Self {
        Self::Unsigned {
            value,
            width: IntWidth::Long,
        }
    }

    pub const fn str(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }

    pub const fn bytes(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }

    pub const fn null_str() -> Self {
        Self::Str(None)
    }

    pub const fn ptr(addr: usize) -> Self {
        Self::Pointer(addr)
    }

    pub fn ptr_of<T>(p: *const T) -> Self {
        Self::Pointer(p.addr())
    }

    pub const fn null_ptr() -> Self {
        Self::Pointer(0)
    }

    /// Human-readable tag name, used in mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Signed {
                width: IntWidth::Short,
                ..
            } => "short",
            Self::Signed {
                width: IntWidth::Int,
                ..
            } => "int",
            Self::Signed {
                width: IntWidth::Long,
                ..
            } => "long",
            Self::Unsigned {
                width: IntWidth::Short,
                ..
            } => "unsigned short",
            Self::Unsigned {
                width: IntWidth::Int,
                ..
            } => "unsigned int",
            Self::Unsigned {
                width: IntWidth::Long,
                ..
            } => "unsigned long",
            Self::Pointer(_) => "pointer",
        }
    }

    /// Raw two's-complement bits of an integer-like argument.
    fn int_bits(&self) -> Option<u64> {
        match *self {
            Self::Signed { value, .. } => Some(value as u64),
            Self::Unsigned { value, .. } => Some(value),
            Self::Char(c) => Some(u64::from(c)),
            _ => None,
        }
    }
}

impl From<i16> for Arg<'_> {
    fn from(value: i16) -> Self {
        Self::short(value)
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Self::int(value)
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Self::long(value)
    }
}

impl From<u16> for Arg<'_> {
    fn from(value: u16) -> Self {
        Self::ushort(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Self::uint(value)
    }
}

impl From<u64> for Arg<'_> {
    fn from(value: u64) -> Self {
        Self::ulong(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Self::str(s)
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::bytes(s)
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Self::Str(s.map(str::as_bytes))
    }
}

/// Positional reader over an argument slice.
#[derive(Debug)]
pub struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    pub fn new(args: &'s [Arg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Number of arguments consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }

    fn take(&mut self) -> Result<(usize, Arg<'a>), FormatError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(FormatError::MissingArgument { index })?;
        self.next += 1;
        Ok((index, arg))
    }

    fn int_bits(&mut self, expected: &'static str) -> Result<u64, FormatError> {
        let (index, arg) = self.take()?;
        arg.int_bits().ok_or(FormatError::ArgumentMismatch {
            index,
            expected,
            found: arg.kind(),
        })
    }

    /// Fetch an argument for a signed conversion, narrowed by `length`.
    pub fn signed(&mut self, length: LengthModifier) -> Result<i64, FormatError> {
        let bits = self.int_bits("integer")?;
        Ok(match length {
            LengthModifier::Short => i64::from(bits as i16),
            LengthModifier::None => i64::from(bits as i32),
            LengthModifier::Long => bits as i64,
        })
    }

    /// Fetch an argument for an unsigned conversion, narrowed by `length`.
    pub fn unsigned(&mut self, length: LengthModifier) -> Result<u64, FormatError> {
        let bits = self.int_bits("integer")?;
        Ok(match length {
            LengthModifier::Short => u64::from(bits as u16),
            LengthModifier::None => u64::from(bits as u32),
            LengthModifier::Long => bits,
        })
    }

    /// Fetch a `*` field width. Negative widths clamp to zero.
    pub fn width(&mut self) -> Result<usize, FormatError> {
        let width = self.int_bits("integer width")? as i32;
        Ok(usize::try_from(width).unwrap_or(0))
    }

    pub fn char(&mut self) -> Result<u8, FormatError> {
        Ok(self.int_bits("char")? as u8)
    }

    pub fn string(&mut self) -> Result<Option<&'a [u8]>, FormatError> {
        match self.take()? {
            (_, Arg::Str(s)) => Ok(s),
            (index, other) => Err(FormatError::ArgumentMismatch {
                index,
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    pub fn pointer(&mut self) -> Result<usize, FormatError> {
        match self.take()? {
            (_, Arg::Pointer(addr)) => Ok(addr),
            (index, other) => Err(FormatError::ArgumentMismatch {
                index,
                expected: "pointer",
                found: other.kind(),
            }),
        }
    }
}
