//! Number formatting for the display and the memory indicator

/// Significant digits shown by the memory indicator
pub const MEMORY_SIGNIFICANT_DIGITS: usize = 4;

/// Formats a result for the input buffer.
///
/// Uses the shortest decimal text that round-trips to the same `f64` and never
/// switches to exponent notation, so the text can be parsed again as part of a
/// longer expression. Negative zero renders as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Formats a value with `digits` significant digits in the style of C's `%g`.
///
/// Trailing zeros are trimmed. Exponent notation (`1.235e+04`) is used when the
/// decimal exponent is below -4 or at least `digits`.
#[must_use]
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{value}");
    }

    // Round first, then read the exponent of the rounded value (9999.7 -> 1.000e4)
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Formats the memory register the way the indicator shows it
#[must_use]
pub fn format_memory(value: f64) -> String {
    format!("M: {}", format_significant(value, MEMORY_SIGNIFICANT_DIGITS))
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
