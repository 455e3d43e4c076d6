//! Compact rendering of vote counts ("1.5K", "-2.5K", "3M").

const SUFFIXES: [char; 5] = ['K', 'M', 'B', 'T', 'Q'];

/// floor(log1000(magnitude)) for magnitude > 0, in exact integer arithmetic.
fn magnitude_exponent(mut magnitude: u64) -> usize {
    let mut exp = 0;
    while magnitude >= 1000 {
        magnitude /= 1000;
        exp += 1;
    }
    exp
}

/// Format a count the way the comment list shows it after a vote.
///
/// Below 1000 in magnitude, and past the quadrillion range, the plain
/// decimal string is returned. Otherwise the mantissa is truncated (not
/// rounded) to one decimal, a trailing `.0` is dropped and the suffix appended.
pub fn compact_int(value: i64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let magnitude = value.unsigned_abs();
    let exp = magnitude_exponent(magnitude);
    if exp < 1 || exp > SUFFIXES.len() {
        return value.to_string();
    }

    let divisor = 1000u64.pow(exp as u32);
    let whole = magnitude / divisor;
    let tenths = (magnitude % divisor) / (divisor / 10);

    let sign = if value < 0 { "-" } else { "" };
    let suffix = SUFFIXES[exp - 1];
    if tenths == 0 {
        format!("{}{}{}", sign, whole, suffix)
    } else {
        format!("{}{}.{}{}", sign, whole, tenths, suffix)
    }
}

/// Format a count for server-rendered markup (the `intcompact` template filter).
///
/// Magnitudes under 10 000 are printed as-is. Larger values are rounded to
/// one decimal, keeping a trailing `.0`.
pub fn intcompact(value: i64) -> String {
    let magnitude = value.unsigned_abs();
    if magnitude < 10_000 {
        return value.to_string();
    }

    let exp = magnitude_exponent(magnitude);
    if exp > SUFFIXES.len() {
        return value.to_string();
    }

    let scaled = value as f64 / 1000f64.powi(exp as i32);
    format!("{:.1}{}", scaled, SUFFIXES[exp - 1])
}
