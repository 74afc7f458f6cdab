//! Defensive numeric parsing for form-field values.
//!
//! Every value the host hands us is a string (or absent). Counts, tiers and
//! gauges are parsed with a default so that a blank or garbled field never
//! aborts a recomputation.

/// Parses the leading base-10 integer of `value`, or returns `default`.
///
/// Leading and trailing whitespace is ignored, an optional sign is accepted,
/// and parsing stops at the first non-digit (so `"3 dots"` yields 3). Empty,
/// non-numeric and absent input all yield `default`.
///
/// # Examples
///
/// ```
/// use babel_domain::common::parse_int;
///
/// assert_eq!(parse_int(Some("4"), 0), 4);
/// assert_eq!(parse_int(Some("-1"), 0), -1);
/// assert_eq!(parse_int(Some(" 2.5 "), 0), 2);
/// assert_eq!(parse_int(Some("risky"), 7), 7);
/// assert_eq!(parse_int(None, 5), 5);
/// ```
pub fn parse_int(value: Option<&str>, default: i32) -> i32 {
    let Some(raw) = value else {
        return default;
    };
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return default;
    }

    match digits[..end].parse::<i64>() {
        Ok(magnitude) => {
            let signed = if negative { -magnitude } else { magnitude };
            i32::try_from(signed).unwrap_or(default)
        }
        // Too many digits to fit.
        Err(_) => default,
    }
}

/// Same as [`parse_int`] for an owned-or-borrowed string that is always present.
pub fn parse_int_or(value: &str, default: i32) -> i32 {
    parse_int(Some(value), default)
}

/// Interprets a checkbox-style field.
///
/// The host stores checked boxes as `"1"` (or `"on"` for unnamed values);
/// anything that parses to a positive integer, or reads `on`/`true`, is set.
pub fn parse_flag(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) if v.eq_ignore_ascii_case("on") || v.eq_ignore_ascii_case("true") => true,
        Some(v) => parse_int(Some(v), 0) > 0,
    }
}
