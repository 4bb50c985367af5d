//! Text helpers shared by the classifier and the normalizers.
//!
//! NOTAM text and extracted labels arrive from many sources, so blank and
//! digit handling is Unicode-aware rather than ASCII-only.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern compiles"));

/// Unicode whitespace plus the ASCII information separators (file, group,
/// record and unit separators), which NOTAM feeds use as field breaks.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// `text` without leading or trailing [`is_space`] characters
pub fn strip(text: &str) -> &str {
    text.trim_matches(is_space)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of any Unicode decimal digit (`'７'` is 7, `'٣'` is 3).
///
/// Decimal digits are encoded in contiguous runs of ten starting at zero, so
/// the value is the distance back to the start of the run, modulo ten.
pub fn digit_value(c: char) -> Option<u32> {
    if c.is_ascii_digit() {
        return c.to_digit(10);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}

/// Replace every non-ASCII decimal digit with its ASCII counterpart.
pub fn fold_digits(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| match digit_value(c) {
                Some(value) if !c.is_ascii_digit() => char::from_digit(value, 10).unwrap_or(c),
                _ => c,
            })
            .collect(),
    )
}

/// Parse a decimal number written with any script's digits.
pub fn parse_number(text: &str) -> Option<f64> {
    fold_digits(text).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_count_as_space() {
        assert_eq!(strip("\x1c RWY 09 \x1f"), "RWY 09");
        assert_eq!(strip("\u{3000}\u{85}"), "");
        assert_eq!(strip("\x1c"), "");
    }

    #[test]
    fn test_digit_values_across_scripts() {
        assert_eq!(digit_value('7'), Some(7));
        assert_eq!(digit_value('７'), Some(7));
        assert_eq!(digit_value('٣'), Some(3));
        assert_eq!(digit_value('०'), Some(0));
        // Mathematical bold nine, inside a block of adjacent digit runs
        assert_eq!(digit_value('\u{1D7D7}'), Some(9));
        assert_eq!(digit_value('N'), None);
        assert_eq!(digit_value('Ⅻ'), None);
    }

    #[test]
    fn test_fold_digits() {
        assert_eq!(fold_digits("６４４９N"), "6449N");
        assert_eq!(fold_digits("6449N"), "6449N");
        assert_eq!(parse_number("２２.５"), Some(22.5));
        assert_eq!(parse_number("N"), None);
    }
}
