//! printf entry points.
//!
//! Rust callers hand over a typed [`Arg`] slice directly. C callers cannot
//! pass a Rust slice, so they describe each argument with a tagged
//! [`FpArg`] record; the record array is decoded into an `Arg` list before
//! the core driver runs.

use std::ffi::{CStr, c_char, c_int, c_void};

use frankenprintf_core::{Arg, FormatError, format_and_write};

use crate::errno_abi::set_errno;
use crate::fd_sink::FdSink;

// ---------------------------------------------------------------------------
// Rust entry points
// ---------------------------------------------------------------------------

/// Format to `fd`. Returns the logical byte count, or `-1` with errno set.
///
/// A field width or total count past `INT_MAX` fails with `EOVERFLOW`
/// before the offending directive writes anything.
pub fn printf_fd(fd: c_int, format: Option<&[u8]>, args: &[Arg<'_>]) -> c_int {
    let mut sink = FdSink::new(fd);
    finish(format_and_write(&mut sink, format, args))
}

/// Format to standard output.
pub fn _printf(format: Option<&[u8]>, args: &[Arg<'_>]) -> c_int {
    printf_fd(libc::STDOUT_FILENO, format, args)
}

fn finish(result: Result<usize, FormatError>) -> c_int {
    match result {
        Ok(count) => c_int::try_from(count).unwrap_or_else(|_| {
            set_errno(libc::EOVERFLOW);
            -1
        }),
        Err(err) => {
            set_errno(err.errno());
            -1
        }
    }
}

// ---------------------------------------------------------------------------
// C entry point
// ---------------------------------------------------------------------------

pub const FP_ARG_CHAR: u32 = 1;
pub const FP_ARG_SHORT: u32 = 2;
pub const FP_ARG_INT: u32 = 3;
pub const FP_ARG_LONG: u32 = 4;
pub const FP_ARG_USHORT: u32 = 5;
pub const FP_ARG_UINT: u32 = 6;
pub const FP_ARG_ULONG: u32 = 7;
/// `ptr` is a NUL-terminated string; null prints `(null)`.
pub const FP_ARG_STR: u32 = 8;
/// `ptr` is the address to print.
pub const FP_ARG_PTR: u32 = 9;

/// One argument as laid out by a C caller.
///
/// Integer tags read `value` (truncated to the tag's width); string and
/// pointer tags read `ptr`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FpArg {
    pub tag: u32,
    pub value: u64,
    pub ptr: *const c_void,
}

impl FpArg {
    #[must_use]
    pub const fn int(tag: u32, value: u64) -> Self {
        Self {
            tag,
            value,
            ptr: std::ptr::null(),
        }
    }

    #[must_use]
    pub const fn pointer(tag: u32, ptr: *const c_void) -> Self {
        Self { tag, value: 0, ptr }
    }
}

/// Decode one record. Unknown tags yield `None`.
///
/// # Safety
///
/// For `FP_ARG_STR`, a non-null `ptr` must point to a NUL-terminated string
/// that outlives `'a`.
unsafe fn decode_arg<'a>(raw: &FpArg) -> Option<Arg<'a>> {
    let v = raw.value;
    Some(match raw.tag {
        FP_ARG_CHAR => Arg::char(v as u8),
        FP_ARG_SHORT => Arg::short(v as i16),
        FP_ARG_INT => Arg::int(v as i32),
        FP_ARG_LONG => Arg::long(v as i64),
        FP_ARG_USHORT => Arg::ushort(v as u16),
        FP_ARG_UINT => Arg::uint(v as u32),
        FP_ARG_ULONG => Arg::ulong(v),
        FP_ARG_STR if raw.ptr.is_null() => Arg::null_str(),
        // SAFETY: caller guarantees a NUL-terminated string.
        FP_ARG_STR => Arg::bytes(unsafe { CStr::from_ptr(raw.ptr.cast::<c_char>()) }.to_bytes()),
        FP_ARG_PTR => Arg::ptr_of(raw.ptr),
        _ => return None,
    })
}

/// Format `format` with `nargs` tagged arguments and write it to `fd`.
///
/// Returns the number of bytes produced, or `-1` with errno set:
/// `EINVAL` for a null format, a null `args` with `nargs > 0`, an unknown
/// tag, or a malformed directive; the sink's errno for write failures.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn frankenprintf_write(
    fd: c_int,
    format: *const c_char,
    args: *const FpArg,
    nargs: usize,
) -> c_int {
    if format.is_null() {
        set_errno(libc::EINVAL);
        return -1;
    }
    let raw: &[FpArg] = if nargs == 0 {
        &[]
    } else if args.is_null() {
        set_errno(libc::EINVAL);
        return -1;
    } else {
        // SAFETY: caller provides `nargs` readable records.
        unsafe { std::slice::from_raw_parts(args, nargs) }
    };

    let mut decoded = Vec::with_capacity(raw.len());
    for record in raw {
        // SAFETY: string records point at NUL-terminated data for this call.
        match unsafe { decode_arg(record) } {
            Some(arg) => decoded.push(arg),
            None => {
                set_errno(libc::EINVAL);
                return -1;
            }
        }
    }

    // SAFETY: checked non-null above; the caller passes a C string.
    let fmt = unsafe { CStr::from_ptr(format) }.to_bytes();
    printf_fd(fd, Some(fmt), &decoded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
