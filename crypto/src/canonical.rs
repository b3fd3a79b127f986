//! Canonical JSON encoding of block headers.
//!
//! Ledger files are exchanged between implementations, so the bytes fed to
//! the header hash must be reproducible everywhere. The encoding is:
//!
//! - object keys sorted by code point, recursively
//! - `", "` between items and `": "` between key and value
//! - strings ASCII-only: `\"`, `\\`, `\n`, `\r`, `\t`, `\b`, `\f` short
//!   escapes, everything else outside `0x20..=0x7e` as lowercase `\uXXXX`
//!   (UTF-16 surrogate pairs above the BMP)
//! - integers printed with every digit, floats printed like Python's `repr`
//!   (shortest round-trip digits, exponent form below `1e-4` and from `1e16`
//!   with a signed exponent of at least two digits, `.0` on integral values)
//!
//! Keys are sorted explicitly rather than relying on `serde_json::Map`
//! ordering, which changes when the `preserve_order` feature is enabled
//! anywhere in the dependency graph.

use serde_json::{Number, Value};
use votechain_types::BlockHeader;

/// Encode a header in canonical form.
pub fn canonical_header(header: &BlockHeader) -> String {
    let mut out = String::with_capacity(160);
    out.push_str("{\"data\": ");
    write_value(&mut out, &header.data);
    out.push_str(", \"index\": ");
    out.push_str(&header.index.to_string());
    out.push_str(", \"previous_hash\": ");
    write_string(&mut out, &header.previous_hash);
    out.push_str(", \"timestamp\": ");
    write_string(&mut out, header.timestamp.as_str());
    out.push_str(", \"version\": ");
    write_string(&mut out, &header.version);
    out.push('}');
    out
}

/// Encode an arbitrary JSON value in canonical form.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    let text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        // Integer literal: keep it verbatim, whatever its size.
        if text == "-0" {
            out.push('0');
        } else {
            out.push_str(&text);
        }
        return;
    }
    match text.parse::<f64>() {
        Ok(x) => write_float(out, x),
        Err(_) => out.push_str(&text),
    }
}

fn write_float(out: &mut String, x: f64) {
    if x.is_nan() {
        out.push_str("NaN");
        return;
    }
    if x.is_infinite() {
        out.push_str(if x < 0.0 { "-Infinity" } else { "Infinity" });
        return;
    }
    if x.is_sign_negative() {
        out.push('-');
    }

    // Shortest round-trip digits with a decimal exponent, e.g. "1.5e-7".
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-4..16).contains(&exp) {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.unsigned_abs()));
    } else if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let point = exp as usize + 1;
        if digits.len() <= point {
            out.push_str(&digits);
            for _ in digits.len()..point {
                out.push('0');
            }
            out.push_str(".0");
        } else {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
}
