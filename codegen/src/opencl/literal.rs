//! Literal spelling.

/// Exact hexadecimal floating-point spelling, e.g. `0x1.8p+1` for `3.0`.
///
/// Matches the C `%a` conversion: normalized mantissa with trailing zero digits removed,
/// signed decimal binary exponent.
pub fn hexfloat(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-INFINITY" } else { "INFINITY" }.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & ((1u64 << 52) - 1);
    let (lead, exponent) = match (biased, mantissa) {
        (0, 0) => (0, 0),
        (0, _) => (0, -1022),
        _ => (1, biased - 1023),
    };

    let digits = format!("{mantissa:013x}");
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        format!("{sign}0x{lead}p{exponent:+}")
    } else {
        format!("{sign}0x{lead}.{digits}p{exponent:+}")
    }
}

/// String body with C escapes; the quotes are added by the caller.
pub fn escaped_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c => out.push(c),
        }
    }
    out
}
