//! Number formatting shared by the text codecs.

/// Formats `value` in scientific notation with `precision` fractional digits,
/// right-aligned in `width` columns, with a signed exponent of at least two digits
/// (`1.00000000e+00`, `-2.50000000e-03`).
pub fn format_scientific(value: f64, precision: usize, width: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    let formatted = normalize_exponent(&raw).unwrap_or(raw);
    format!("{:>width$}", formatted, width = width)
}

/// Formats `value` with the shortest representation that parses back to the same
/// number, always carrying a fractional part or an exponent (`10.0`, `0.5`, `1e-05`,
/// `1e+16`).
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let fixed = format!("{}", value);
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    } else {
        let raw = format!("{:e}", value);
        normalize_exponent(&raw).unwrap_or(raw)
    }
}

fn normalize_exponent(raw: &str) -> Option<String> {
    let (mantissa, exponent) = raw.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let sign = if exponent < 0 { '-' } else { '+' };
    Some(format!("{}e{}{:02}", mantissa, sign, exponent.abs()))
}
