#![no_main]
use frankenprintf_core::{Arg, FormatError, PrintfConfig, Sink, SinkError, format_and_write_with};
use libfuzzer_sys::fuzz_target;

// Widths up to INT_MAX are legal, so the sink only counts and refuses to
// take more than BUDGET bytes.
const BUDGET: usize = 1 << 20;

#[derive(Default)]
struct CountingSink {
    delivered: usize,
    exhausted: bool,
}

impl Sink for CountingSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        if self.delivered + bytes.len() > BUDGET {
            self.exhausted = true;
            return Err(SinkError::Closed);
        }
        self.delivered += bytes.len();
        Ok(bytes.len())
    }
}

// The first byte picks the buffer capacity; the rest is the format string.
// The fixed argument list covers every tag so most directives get a value.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, format)) = data.split_first() else {
        return;
    };
    let args = [
        Arg::int(-42),
        Arg::str("fuzz"),
        Arg::ulong(u64::MAX),
        Arg::char(b'Z'),
        Arg::ptr(0x1000),
        Arg::null_str(),
        Arg::null_ptr(),
        Arg::short(-1),
    ];
    let config = PrintfConfig::with_capacity(usize::from(cap));

    let mut sink = CountingSink::default();
    match format_and_write_with(&config, &mut sink, Some(format), &args) {
        Ok(count) => assert_eq!(count, sink.delivered),
        Err(FormatError::Sink(e)) => assert!(sink.exhausted, "unexpected sink error: {e}"),
        Err(_) => {
            // Aborted calls never deliver more than was flushed.
            assert!(sink.delivered % config.buffer_capacity == 0);
        }
    }
});
