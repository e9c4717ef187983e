//! Runtime configuration.
//!
//! The output buffer capacity is set via the `FRANKENPRINTF_BUFFER_SIZE`
//! environment variable (decimal byte count). Unset, unparsable or zero
//! values fall back to [`DEFAULT_BUFFER_CAPACITY`]; larger values are clamped
//! to [`MAX_BUFFER_CAPACITY`].

use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable consulted by [`printf_config`].
pub const BUFFER_SIZE_ENV: &str = "FRANKENPRINTF_BUFFER_SIZE";

/// Buffer capacity used when nothing else is configured.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Upper bound on a configured buffer capacity (1 MiB).
pub const MAX_BUFFER_CAPACITY: usize = 1 << 20;

/// Per-call formatting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintfConfig {
    /// Bytes held before the buffer flushes to the sink. Always `>= 1`.
    pub buffer_capacity: usize,
}

impl Default for PrintfConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl PrintfConfig {
    /// Config with an explicit capacity, normalized into `[1, MAX_BUFFER_CAPACITY]`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer_capacity: capacity.clamp(1, MAX_BUFFER_CAPACITY),
        }
    }

    /// Read the configuration from the environment, bypassing the cache.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(BUFFER_SIZE_ENV)
            .map(|raw| parse_buffer_size_env(&raw))
            .unwrap_or_default()
    }
}

fn parse_buffer_size_env(raw: &str) -> PrintfConfig {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => PrintfConfig::default(),
        Ok(n) => PrintfConfig::with_capacity(n),
    }
}

// Atomic cache: 0=unresolved, usize::MAX=resolving, anything else is the
// resolved capacity. Capacities are clamped well below usize::MAX, so the
// sentinels never collide with a real value.
static CACHED_CAPACITY: AtomicUsize = AtomicUsize::new(0);

const CAPACITY_UNRESOLVED: usize = 0;
const CAPACITY_RESOLVING: usize = usize::MAX;

/// Get the process configuration (reads the environment on first call,
/// caches thereafter).
///
/// A call that races the first resolution gets the default configuration
/// instead of blocking.
#[must_use]
pub fn printf_config() -> PrintfConfig {
    let cached = CACHED_CAPACITY.load(Ordering::Acquire);
    if cached != CAPACITY_UNRESOLVED && cached != CAPACITY_RESOLVING {
        return PrintfConfig::with_capacity(cached);
    }
    if cached == CAPACITY_RESOLVING {
        return PrintfConfig::default();
    }

    if CACHED_CAPACITY
        .compare_exchange(
            CAPACITY_UNRESOLVED,
            CAPACITY_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_CAPACITY.load(Ordering::Acquire);
        return if v != CAPACITY_UNRESOLVED && v != CAPACITY_RESOLVING {
            PrintfConfig::with_capacity(v)
        } else {
            PrintfConfig::default()
        };
    }

    let config = PrintfConfig::from_env();
    CACHED_CAPACITY.store(config.buffer_capacity, Ordering::Release);
    config
}
