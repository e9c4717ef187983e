//! Thread-local errno access.
//!
//! Thin wrappers over the platform's errno location so the entry points can
//! report failures the way C callers expect.

use std::ffi::c_int;

#[cfg(any(target_os = "linux", target_os = "android", target_os = "emscripten"))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__errno_location() }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__error() }
}

#[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__errno() }
}

/// Store `value` in the calling thread's errno.
#[inline]
pub fn set_errno(value: c_int) {
    // SAFETY: the errno slot is valid for the lifetime of the thread.
    unsafe { *errno_location() = value };
}

/// Read the calling thread's errno.
#[inline]
#[must_use]
pub fn errno() -> c_int {
    // SAFETY: see `set_errno`.
    unsafe { *errno_location() }
}
