// Tolerant JSON decoding for panel responses.
//
// Panel firmware emits raw control characters (tabs, newlines) inside string
// values, which strict JSON forbids. Duplicate object keys also occur; the
// `serde_json::Value` map already keeps the last occurrence.

use serde_json::Value;

/// Parse a panel body into a [`Value`].
///
/// Strict parsing is tried first. If it fails, unescaped control characters
/// inside string literals are re-escaped and the body is parsed again. The
/// original error is returned when the second attempt fails too.
pub fn from_str(body: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let Some(escaped) = escape_control_chars(body) else {
                return Err(strict_err);
            };
            serde_json::from_str(&escaped).map_err(|_| strict_err)
        }
    }
}

/// Re-escape control characters that appear inside string literals.
///
/// Returns `None` when nothing needed escaping.
fn escape_control_chars(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut changed = false;

    for c in body.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            } else if u32::from(c) < 0x20 {
                changed = true;
                match c {
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    other => out.push_str(&format!("\\u{:04x}", u32::from(other))),
                }
                continue;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }

    changed.then_some(out)
}
