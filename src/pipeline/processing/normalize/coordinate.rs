//! Free-text geographic coordinates to canonical `"lat, lon"` decimal degrees.
//!
//! NOTAM authors write positions in many notations. Each notation we accept is
//! a row of [`FORMAT_RULES`], tried in order; the first row whose pattern
//! matches the start of the prepared input wins. Output precision follows the
//! source resolution: 4 decimals for degree-minute notations, 6 when seconds
//! were given.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use crate::text::{parse_number, strip};

/// Already canonical: `-?d+.d+, -?d+.d+` (digits of any script)
static DECIMAL_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.\d+,\s*-?\d+\.\d+").expect("decimal pattern compiles"));

/// Separators between the vertices of an area description, in the order tried.
pub const AREA_SEPARATORS: [&str; 3] = [" - ", ", ", ","];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Source resolved to minutes
    Minutes,
    /// Source resolved to seconds (or tenths of a second)
    Seconds,
}

impl Precision {
    pub fn decimals(self) -> usize {
        match self {
            Precision::Minutes => 4,
            Precision::Seconds => 6,
        }
    }
}

/// Signed decimal degrees, north and east positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub precision: Precision,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.precision.decimals();
        write!(f, "{:.*}, {:.*}", decimals, self.latitude, decimals, self.longitude)
    }
}

/// The notations recognised, each documented with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    /// `243433.9N 0814228.8W`, `010641N1040624E`
    CompactDms,
    /// `6449N14751W`
    CompactDm,
    /// `64°49'N 147°51'W`
    SymbolDm,
    /// `N24 34 33.9/W81 42 28.8`
    PrefixSpacedDms,
    /// `35°44'50.6"N 139°20'37.6"E`
    SymbolDms,
    /// `N521603.9 E1042055.1`
    PrefixCompactDms,
    /// `363818.4N 0062043,6W`
    CompactDmsCommaDecimal,
    /// `4500511S1684416E`: seconds packed as three digits of tenths
    PackedTenths,
}

/// How the input is prepared before a rule's pattern runs against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preparation {
    /// Trimmed, otherwise as written
    Trimmed,
    Upper,
    /// Spaces and slashes removed, upper-cased
    Compact,
    /// Compact, with a decimal comma turned into a point
    CompactCommaDecimal,
}

impl Preparation {
    fn apply(self, trimmed: &str) -> String {
        match self {
            Preparation::Trimmed => trimmed.to_string(),
            Preparation::Upper => trimmed.to_uppercase(),
            Preparation::Compact => compact(trimmed),
            Preparation::CompactCommaDecimal => compact(trimmed).replace(',', "."),
        }
    }
}

fn compact(text: &str) -> String {
    text.replace([' ', '/'], "").to_uppercase()
}

/// Where each component sits in a rule's capture groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLayout {
    /// deg, min, sec, hemi for latitude then longitude
    SuffixDms,
    /// deg, min, hemi for latitude then longitude
    SuffixDm,
    /// hemi, deg, min, sec for latitude then longitude
    PrefixDms,
    /// as `SuffixDms`, seconds in tenths (longitude only when three digits)
    PackedTenths,
}

#[derive(Debug, Clone, Copy)]
struct FormatRule {
    format: CoordinateFormat,
    preparation: Preparation,
    layout: FieldLayout,
    precision: Precision,
    pattern: &'static str,
}

const COMPACT_DMS: &str =
    r"^(\d{2})(\d{2})(\d{2}(?:\.\d+)?)([NS])\s*(\d{2,3})(\d{2})(\d{2}(?:\.\d+)?)([EW])";

const FORMAT_RULES: [FormatRule; 8] = [
    FormatRule {
        format: CoordinateFormat::CompactDms,
        preparation: Preparation::Compact,
        layout: FieldLayout::SuffixDms,
        precision: Precision::Seconds,
        pattern: COMPACT_DMS,
    },
    FormatRule {
        format: CoordinateFormat::CompactDm,
        preparation: Preparation::Compact,
        layout: FieldLayout::SuffixDm,
        precision: Precision::Minutes,
        pattern: r"^(\d{2})(\d{2})([NS])\s*(\d{2,3})(\d{2})([EW])",
    },
    FormatRule {
        format: CoordinateFormat::SymbolDm,
        preparation: Preparation::Upper,
        layout: FieldLayout::SuffixDm,
        precision: Precision::Minutes,
        pattern: r"^(\d+)°(\d+)['\s]*([NS])\s*(\d+)°(\d+)['\s]*([EW])",
    },
    FormatRule {
        format: CoordinateFormat::PrefixSpacedDms,
        preparation: Preparation::Upper,
        layout: FieldLayout::PrefixDms,
        precision: Precision::Seconds,
        pattern: r"^([NS])(\d+)\s+(\d+)\s+(\d+(?:\.\d+)?)\s*/\s*([EW])(\d+)\s+(\d+)\s+(\d+(?:\.\d+)?)",
    },
    FormatRule {
        format: CoordinateFormat::SymbolDms,
        preparation: Preparation::Trimmed,
        layout: FieldLayout::SuffixDms,
        precision: Precision::Seconds,
        pattern: r#"^(\d+)°(\d+)'(\d+(?:\.\d+)?)["″]?\s*([NS])[,\s]+(\d+)°(\d+)'(\d+(?:\.\d+)?)["″]?\s*([EW])"#,
    },
    FormatRule {
        format: CoordinateFormat::PrefixCompactDms,
        preparation: Preparation::Upper,
        layout: FieldLayout::PrefixDms,
        precision: Precision::Seconds,
        pattern: r"^([NS])(\d{2})(\d{2})(\d{2}(?:\.\d+)?)\s+([EW])(\d{2,3})(\d{2})(\d{2}(?:\.\d+)?)",
    },
    FormatRule {
        format: CoordinateFormat::CompactDmsCommaDecimal,
        preparation: Preparation::CompactCommaDecimal,
        layout: FieldLayout::SuffixDms,
        precision: Precision::Seconds,
        pattern: COMPACT_DMS,
    },
    FormatRule {
        format: CoordinateFormat::PackedTenths,
        preparation: Preparation::Compact,
        layout: FieldLayout::PackedTenths,
        precision: Precision::Seconds,
        pattern: r"^(\d{2})(\d{2})(\d{3})([NS])(\d{3})(\d{2})(\d{2,3})([EW])",
    },
];

static COMPILED_RULES: Lazy<Vec<(FormatRule, Regex)>> = Lazy::new(|| {
    FORMAT_RULES
        .iter()
        .map(|rule| (*rule, Regex::new(rule.pattern).expect("coordinate pattern compiles")))
        .collect()
});

/// The priority order in which notations are tried.
pub fn format_priority() -> Vec<CoordinateFormat> {
    FORMAT_RULES.iter().map(|rule| rule.format).collect()
}

pub fn is_decimal_pair(text: &str) -> bool {
    DECIMAL_PAIR.is_match(text)
}

/// Parse a coordinate field to canonical decimal form.
///
/// For an area (several positions joined by a separator) only the first
/// position is kept. Text that matches no notation comes back unchanged;
/// only empty input yields `None`.
pub fn parse_coordinate(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    if is_decimal_pair(raw) {
        return Some(raw.to_string());
    }

    for separator in AREA_SEPARATORS {
        if !raw.contains(separator) {
            continue;
        }
        let first = raw.split(separator).next().unwrap_or(raw);
        if let Some(parsed) = parse_single_coordinate(strip(first)) {
            return Some(parsed);
        }
    }

    parse_single_coordinate(raw).or_else(|| Some(raw.to_string()))
}

/// Parse exactly one position; `None` when no notation matches.
pub fn parse_single_coordinate(raw: &str) -> Option<String> {
    let trimmed = strip(raw);
    if trimmed.is_empty() {
        return None;
    }

    if is_decimal_pair(trimmed) {
        return Some(trimmed.to_string());
    }

    match_coordinate(trimmed).map(|(_, coordinate)| coordinate.to_string())
}

/// Run the format table against `raw` and report which notation matched.
pub fn match_coordinate(raw: &str) -> Option<(CoordinateFormat, Coordinate)> {
    let trimmed = strip(raw);

    COMPILED_RULES.iter().find_map(|(rule, regex)| {
        let prepared = rule.preparation.apply(trimmed);
        let caps = regex.captures(&prepared)?;
        let (latitude, longitude) = extract(rule.layout, &caps)?;
        Some((
            rule.format,
            Coordinate {
                latitude,
                longitude,
                precision: rule.precision,
            },
        ))
    })
}

fn extract(layout: FieldLayout, caps: &Captures<'_>) -> Option<(f64, f64)> {
    match layout {
        FieldLayout::SuffixDms => Some((
            to_decimal(number(caps, 1)?, number(caps, 2)?, number(caps, 3)?, text(caps, 4)?),
            to_decimal(number(caps, 5)?, number(caps, 6)?, number(caps, 7)?, text(caps, 8)?),
        )),
        FieldLayout::SuffixDm => Some((
            to_decimal(number(caps, 1)?, number(caps, 2)?, 0.0, text(caps, 3)?),
            to_decimal(number(caps, 4)?, number(caps, 5)?, 0.0, text(caps, 6)?),
        )),
        FieldLayout::PrefixDms => Some((
            to_decimal(number(caps, 2)?, number(caps, 3)?, number(caps, 4)?, text(caps, 1)?),
            to_decimal(number(caps, 6)?, number(caps, 7)?, number(caps, 8)?, text(caps, 5)?),
        )),
        FieldLayout::PackedTenths => {
            let lat_seconds = number(caps, 3)? / 10.0;
            let lon_raw = text(caps, 7)?;
            let lon_divisor = if lon_raw.chars().count() == 3 { 10.0 } else { 1.0 };
            let lon_seconds = parse_number(lon_raw)? / lon_divisor;
            Some((
                to_decimal(number(caps, 1)?, number(caps, 2)?, lat_seconds, text(caps, 4)?),
                to_decimal(number(caps, 5)?, number(caps, 6)?, lon_seconds, text(caps, 8)?),
            ))
        }
    }
}

fn number(caps: &Captures<'_>, index: usize) -> Option<f64> {
    parse_number(caps.get(index)?.as_str())
}

fn text<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str())
}

fn to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: &str) -> f64 {
    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match hemisphere {
        "S" | "W" => -value,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_of(raw: &str) -> Option<CoordinateFormat> {
        match_coordinate(raw).map(|(format, _)| format)
    }

    #[test]
    fn test_compact_dm_has_four_decimals() {
        assert_eq!(parse_coordinate("6449N14751W").as_deref(), Some("64.8167, -147.8500"));
        assert_eq!(parse_coordinate("5022N00330E").as_deref(), Some("50.3667, 3.5000"));
        assert_eq!(format_of("6449N14751W"), Some(CoordinateFormat::CompactDm));
    }

    #[test]
    fn test_compact_dms_has_six_decimals() {
        assert_eq!(parse_coordinate("010641N1040624E").as_deref(), Some("1.111389, 104.106667"));
        assert_eq!(format_of("010641N1040624E"), Some(CoordinateFormat::CompactDms));
    }

    #[test]
    fn test_compact_dms_decimal_seconds_and_space() {
        assert_eq!(parse_coordinate("101529.6N1235820.2E").as_deref(), Some("10.258222, 123.972278"));
        assert_eq!(parse_coordinate("243433.9N 0814228.8W").as_deref(), Some("24.576083, -81.708000"));
        assert_eq!(parse_coordinate("243433.9N 814228.8W").as_deref(), Some("24.576083, -81.708000"));
    }

    #[test]
    fn test_southern_hemisphere_is_negative() {
        assert_eq!(parse_coordinate("334648S1510920E").as_deref(), Some("-33.780000, 151.155556"));
    }

    #[test]
    fn test_symbol_degree_minutes() {
        assert_eq!(parse_coordinate("64°49'N 147°51'W").as_deref(), Some("64.8167, -147.8500"));
        assert_eq!(format_of("64°49'N 147°51'W"), Some(CoordinateFormat::SymbolDm));
    }

    #[test]
    fn test_hemisphere_prefix_with_spaces() {
        assert_eq!(parse_coordinate("N24 34 33.9/W81 42 28.8").as_deref(), Some("24.576083, -81.708000"));
        assert_eq!(format_of("N24 34 33.9/W81 42 28.8"), Some(CoordinateFormat::PrefixSpacedDms));
    }

    #[test]
    fn test_symbol_dms_with_comma_separator() {
        assert_eq!(
            parse_coordinate("37°5'7.3\"N, 127°2'26.1\"E").as_deref(),
            Some("37.085361, 127.040583")
        );
        assert_eq!(format_of("35°44'50.6\"N 139°20'37.6\"E"), Some(CoordinateFormat::SymbolDms));
    }

    #[test]
    fn test_hemisphere_prefix_compact() {
        assert_eq!(parse_coordinate("N521603.9 E1042055.1").as_deref(), Some("52.267750, 104.348639"));
        assert_eq!(format_of("N521603.9 E1042055.1"), Some(CoordinateFormat::PrefixCompactDms));
    }

    #[test]
    fn test_comma_decimal_seconds() {
        assert_eq!(parse_coordinate("363818.4N 0062043,6W").as_deref(), Some("36.638444, -6.345444"));
        assert_eq!(format_of("363818.4N 0062043,6W"), Some(CoordinateFormat::CompactDmsCommaDecimal));
    }

    #[test]
    fn test_packed_tenths_of_seconds() {
        assert_eq!(parse_coordinate("4500511S1684416E").as_deref(), Some("-45.014194, 168.737778"));
        assert_eq!(format_of("4500511S1684416E"), Some(CoordinateFormat::PackedTenths));
    }

    #[test]
    fn test_decimal_is_returned_as_is() {
        assert_eq!(parse_coordinate("64.8167, -147.8500").as_deref(), Some("64.8167, -147.8500"));
        assert_eq!(parse_coordinate("1.5,2.25").as_deref(), Some("1.5,2.25"));
    }

    #[test]
    fn test_area_keeps_first_position() {
        assert_eq!(
            parse_coordinate("6449N14751W - 6450N14752W - 6451N14750W").as_deref(),
            Some("64.8167, -147.8500")
        );
        assert_eq!(
            parse_coordinate("010641N1040624E, 010700N1040700E").as_deref(),
            Some("1.111389, 104.106667")
        );
    }

    #[test]
    fn test_q_line_suffix_is_ignored() {
        // Radius digits after the position do not prevent a prefix match
        assert_eq!(parse_coordinate("6449N14751W005").as_deref(), Some("64.8167, -147.8500"));
    }

    #[test]
    fn test_unrecognized_text_passes_through() {
        assert_eq!(parse_coordinate("NEAR THR 27").as_deref(), Some("NEAR THR 27"));
        assert_eq!(parse_coordinate("ARP").as_deref(), Some("ARP"));
        assert_eq!(parse_single_coordinate("NEAR THR 27"), None);
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_single_coordinate("   "), None);
    }

    #[test]
    fn test_digits_of_any_script() {
        assert_eq!(parse_coordinate("６４４９N１４７５１W").as_deref(), Some("64.8167, -147.8500"));
        assert_eq!(parse_coordinate("٦٤٤٩N١٤٧٥١W").as_deref(), Some("64.8167, -147.8500"));
        assert_eq!(
            parse_coordinate("４５００５１１S１６８４４１６E").as_deref(),
            Some("-45.014194, 168.737778")
        );
        assert!(is_decimal_pair("６４.８, １.２"));
    }

    #[test]
    fn test_full_width_hemisphere_letters_pass_through() {
        assert_eq!(parse_coordinate("６４４９Ｎ１４７５１Ｗ").as_deref(), Some("６４４９Ｎ１４７５１Ｗ"));
    }

    #[test]
    fn test_separator_padding_is_stripped() {
        assert_eq!(parse_single_coordinate("\x1c6449N14751W\x1f").as_deref(), Some("64.8167, -147.8500"));
    }

    #[test]
    fn test_parsing_output_is_stable() {
        for raw in ["6449N14751W", "N521603.9 E1042055.1", "4500511S1684416E", "NEAR THR 27"] {
            let once = parse_coordinate(raw).unwrap();
            assert_eq!(parse_coordinate(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            format_priority(),
            vec![
                CoordinateFormat::CompactDms,
                CoordinateFormat::CompactDm,
                CoordinateFormat::SymbolDm,
                CoordinateFormat::PrefixSpacedDms,
                CoordinateFormat::SymbolDms,
                CoordinateFormat::PrefixCompactDms,
                CoordinateFormat::CompactDmsCommaDecimal,
                CoordinateFormat::PackedTenths,
            ]
        );
    }
}
