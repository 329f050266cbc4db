//! Locale-independent number formatting for report values

use crate::constants::AVERAGE_FRACTION_DIGITS;

/// Format an average with at most seven fractional digits.
///
/// Trailing zeros and a dangling decimal point are removed, so `32.5140000`
/// prints as `32.514` and `33.0` as `33`. Values that round to zero print as
/// `0` regardless of sign.
pub fn format_average(value: f64) -> String {
    let fixed = format!("{:.*}", AVERAGE_FRACTION_DIGITS, value);
    let trimmed = match fixed.find('.') {
        Some(_) => fixed.trim_end_matches('0').trim_end_matches('.'),
        None => fixed.as_str(),
    };

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
