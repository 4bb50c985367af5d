use serde::Serialize;
use serde_json::Value;
use std::ops::AddAssign;
use tracing::debug;

use super::bearing::parse_bearing;
use super::coordinate::parse_coordinate;
use crate::constants::ALL_RUNWAYS_SENTINEL;
use crate::types::{
    degrees_value, is_truthy, RunwayEntry, SilverRecord, OBSTACLE_BEARING, OBSTACLE_COORDINATES, RUNWAY,
};

/// What `sanitize_entry` changed. Re-sanitizing an entry reports no changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeStats {
    pub entries: usize,
    pub runways_cleared: usize,
    pub coordinates_converted: usize,
    pub bearings_converted: usize,
    /// Bearings that matched nothing and were overwritten with null
    pub bearings_dropped: usize,
}

impl SanitizeStats {
    pub fn changes(&self) -> usize {
        self.runways_cleared + self.coordinates_converted + self.bearings_converted + self.bearings_dropped
    }
}

impl AddAssign for SanitizeStats {
    fn add_assign(&mut self, other: Self) {
        self.entries += other.entries;
        self.runways_cleared += other.runways_cleared;
        self.coordinates_converted += other.coordinates_converted;
        self.bearings_converted += other.bearings_converted;
        self.bearings_dropped += other.bearings_dropped;
    }
}

/// Remove known labeling artifacts from one runway entry, in place.
///
/// - `runway == "ALL"` becomes null.
/// - Coordinate text is rewritten to decimal; unparseable text is left alone.
/// - Non-numeric bearings are rewritten to degrees; unparseable ones become null.
///
/// Numeric bearings and every other field are never touched.
pub fn sanitize_entry(entry: &mut RunwayEntry) -> SanitizeStats {
    let mut stats = SanitizeStats {
        entries: 1,
        ..SanitizeStats::default()
    };

    if entry.runway() == Some(ALL_RUNWAYS_SENTINEL) {
        entry.set(RUNWAY, Value::Null);
        stats.runways_cleared = 1;
    }

    let converted = entry
        .obstacle_coordinates()
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| parse_coordinate(raw).filter(|parsed| !parsed.is_empty() && parsed != raw));
    if let Some(parsed) = converted {
        debug!(to = %parsed, "Converted obstacle coordinates");
        entry.set(OBSTACLE_COORDINATES, Value::String(parsed));
        stats.coordinates_converted = 1;
    }

    let rewritten = entry
        .obstacle_bearing()
        .filter(|raw| is_truthy(raw) && !raw.is_number())
        .map(|raw| (raw.to_string(), degrees_value(parse_bearing(Some(raw)))));
    if let Some((raw, parsed)) = rewritten {
        if parsed.is_null() {
            debug!(bearing = %raw, "Dropped unrecognized obstacle bearing");
            stats.bearings_dropped = 1;
        } else {
            stats.bearings_converted = 1;
        }
        entry.set(OBSTACLE_BEARING, parsed);
    }

    stats
}

/// Sanitize every runway entry of a record.
pub fn sanitize_record(record: &mut SilverRecord) -> SanitizeStats {
    let mut stats = SanitizeStats::default();
    for entry in record.runway_entries_mut() {
        stats += sanitize_entry(entry);
    }
    stats
}

pub fn sanitize_records(records: &mut [SilverRecord]) -> SanitizeStats {
    let mut stats = SanitizeStats::default();
    for record in records.iter_mut() {
        stats += sanitize_record(record);
    }
    stats
}
