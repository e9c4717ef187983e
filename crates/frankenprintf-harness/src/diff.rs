//! Diff rendering for fixture comparison.
//!
//! printf output is mostly single-line and full of padding, so besides the
//! per-line view the diff pins the first differing column and shows control
//! bytes escaped.

/// Render a text diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let exp_lines: Vec<&str> = expected.split('\n').collect();
    let act_lines: Vec<&str> = actual.split('\n').collect();
    for i in 0..exp_lines.len().max(act_lines.len()) {
        let e = exp_lines.get(i).copied();
        let a = act_lines.get(i).copied();
        if e == a {
            continue;
        }
        let col = first_mismatch(e.unwrap_or(""), a.unwrap_or(""));
        out.push_str(&format!("@@ line {}, col {} @@\n", i + 1, col + 1));
        if let Some(e) = e {
            out.push_str(&format!("-{}\n", visible(e)));
        }
        if let Some(a) = a {
            out.push_str(&format!("+{}\n", visible(a)));
        }
    }
    out
}

/// Byte offset of the first difference between two strings.
fn first_mismatch(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Escape control characters and mark trailing spaces.
fn visible(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    let trailing = line.len() - line.trim_end_matches(' ').len();
    if trailing > 0 {
        out.push_str(&format!("  <{trailing} trailing space(s)>"));
    }
    out
}
