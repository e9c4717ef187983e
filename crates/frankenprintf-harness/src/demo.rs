//! Reference sample calls.
//!
//! Field width on every conversion the formatter supports, one call per
//! line. `harness demo` prints them through the descriptor sink; the same
//! table doubles as a fixture set.

use crate::fixtures::{FixtureArg, FixtureCase, FixtureSet, SinkBehavior};

/// One sample call and the exact bytes it must print.
#[derive(Debug, Clone)]
pub struct DemoCall {
    pub name: &'static str,
    pub format: &'static str,
    pub args: Vec<FixtureArg>,
    pub expected: String,
}

#[must_use]
pub fn demo_calls() -> Vec<DemoCall> {
    let call = |name, format, args, expected: &str| DemoCall {
        name,
        format,
        args,
        expected: expected.to_string(),
    };
    vec![
        call("char_width", "|%5c|\n", vec![FixtureArg::Char('A')], "|    A|\n"),
        call(
            "string_width",
            "|%10s|\n",
            vec![FixtureArg::Str(Some("hi".into()))],
            "|        hi|\n",
        ),
        call("decimal_width", "|%8d|\n", vec![FixtureArg::Int(123)], "|     123|\n"),
        call("integer_negative_width", "|%8i|\n", vec![FixtureArg::Int(-123)], "|    -123|\n"),
        call("hex_alt_width", "|%#8x|\n", vec![FixtureArg::Uint(0x2a)], "|    0x2a|\n"),
        call("octal_alt_width", "|%#8o|\n", vec![FixtureArg::Uint(0o732)], "|    0732|\n"),
        call(
            "pointer_width",
            "|%20p|\n",
            vec![FixtureArg::Ptr(0xabc)],
            &format!("|{:>20}|\n", "0xabc"),
        ),
        call("percent_width", "|%5%|\n", Vec::new(), "|    %|\n"),
    ]
}

/// The sample calls as a fixture set.
#[must_use]
pub fn demo_fixture_set() -> FixtureSet {
    FixtureSet {
        version: "v1".into(),
        family: "printf/demo".into(),
        description: Some("reference sample calls".into()),
        cases: demo_calls()
            .into_iter()
            .map(|c| FixtureCase {
                name: c.name.into(),
                format: Some(c.format.into()),
                args: c.args,
                expected_count: Some(c.expected.len()),
                expected_output: c.expected,
                expected_error: None,
                buffer_capacity: None,
                sink: SinkBehavior::Ok,
            })
            .collect(),
    }
}
