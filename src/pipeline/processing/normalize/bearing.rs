use serde_json::Value;

use crate::text::{parse_number, strip};

/// 16-point compass rose, clockwise from north.
pub const COMPASS_POINTS: [(&str, f64); 16] = [
    ("N", 0.0),
    ("NNE", 22.5),
    ("NE", 45.0),
    ("ENE", 67.5),
    ("E", 90.0),
    ("ESE", 112.5),
    ("SE", 135.0),
    ("SSE", 157.5),
    ("S", 180.0),
    ("SSW", 202.5),
    ("SW", 225.0),
    ("WSW", 247.5),
    ("W", 270.0),
    ("WNW", 292.5),
    ("NW", 315.0),
    ("NNW", 337.5),
];

/// Convert an obstacle bearing to degrees.
///
/// Numbers pass through untouched (no range check, no wraparound) and a
/// boolean counts as 0 or 1. Text is tried as a number first, then as a
/// compass point. Anything else is `None`.
pub fn parse_bearing(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(degrees) => degrees.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => parse_bearing_str(text),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn parse_bearing_str(text: &str) -> Option<f64> {
    let token = strip(text).to_uppercase();

    if let Some(degrees) = parse_number(&token) {
        return Some(degrees);
    }

    compass_degrees(&token)
}

/// Degrees for an upper-case compass token such as `"SSW"`.
pub fn compass_degrees(token: &str) -> Option<f64> {
    COMPASS_POINTS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, degrees)| *degrees)
}
