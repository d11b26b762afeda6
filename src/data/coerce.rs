// ---------------------------------------------------------------------------
// Cell coercion: raw CSV text → f64
// ---------------------------------------------------------------------------
//
// Every place that turns a raw cell into a number goes through this module.
// The policy is permissive: leading whitespace is skipped and trailing text
// after a valid numeric prefix is ignored, so `"12kg"` reads as `12`.
// When a number is required and nothing parses, the value is `0.0`.

/// Fallback used whenever a cell does not parse as a number.
pub const PARSE_FALLBACK: f64 = 0.0;

/// Parse the longest numeric prefix of `raw`.
///
/// Accepts an optional sign followed by either `Infinity` or
/// `digits[.digits][(e|E)[+-]digits]` with at least one mantissa digit.
/// Returns `None` when no such prefix exists.
pub fn parse_number(raw: &str) -> Option<f64> {
    parse_prefix(raw).map(|(value, _)| value)
}

/// Parse `raw` as a number, falling back to [`PARSE_FALLBACK`].
pub fn coerce_number(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(PARSE_FALLBACK)
}

/// Parse `raw` only if the whole (trimmed) string is a number.
///
/// Used for loose equality, where `"10"` and `"10.0"` must match but
/// `"10kg"` must not be treated as numeric.
pub fn strict_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (value, consumed) = parse_prefix(trimmed)?;
    (consumed == trimmed.len()).then_some(value)
}

/// Whether a cell is compatible with a numeric column: empty, or a finite
/// numeric prefix.
pub fn is_numeric_cell(raw: &str) -> bool {
    raw.is_empty() || parse_number(raw).is_some_and(f64::is_finite)
}

/// Returns the parsed value and the number of bytes of `raw` consumed
/// (including skipped leading whitespace).
fn parse_prefix(raw: &str) -> Option<(f64, usize)> {
    let start = raw.len() - raw.trim_start().len();
    let bytes = raw.as_bytes();
    let mut pos = start;

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if raw[pos..].starts_with("Infinity") {
        let value = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some((value, pos + "Infinity".len()));
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let int_digits = &raw[int_start..pos];

    let mut frac_digits = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        // A lone "." only counts when it follows integer digits ("5." == 5).
        if !int_digits.is_empty() || end > frac_start {
            frac_digits = &raw[frac_start..end];
            pos = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let exp_start = pos + 1;
        let mut end = exp_start;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end > digits_start {
            exponent = &raw[exp_start..end];
            pos = end;
        }
    }

    // Normalise so the std parser always sees `[-]int.frac[eexp]`.
    let mut normalised = String::with_capacity(pos - start + 4);
    if negative {
        normalised.push('-');
    }
    normalised.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    normalised.push('.');
    normalised.push_str(if frac_digits.is_empty() { "0" } else { frac_digits });
    if !exponent.is_empty() {
        normalised.push('e');
        normalised.push_str(exponent);
    }

    normalised.parse::<f64>().ok().map(|value| (value, pos))
}
