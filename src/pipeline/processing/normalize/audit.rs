use serde::Serialize;
use serde_json::Value;

use super::coordinate::is_decimal_pair;
use crate::constants::ALL_RUNWAYS_SENTINEL;
use crate::types::{RunwayEntry, SilverRecord};

/// Counts of labeling artifacts across a silver dataset.
///
/// Run before sanitizing to decide whether a rewrite is needed, and again
/// after to confirm what landed in canonical form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelAudit {
    pub records: usize,
    pub entries: usize,
    /// Entries whose runway is the `"ALL"` sentinel
    pub all_runways: usize,
    /// Coordinate text present but not in decimal form
    pub coordinates_to_convert: usize,
    /// Bearings stored as text that is not a plain number
    pub bearings_to_convert: usize,
    /// Bearings that are neither numbers nor text (booleans, lists, objects)
    pub odd_bearings: usize,
    pub coordinates_in_decimal: usize,
    pub numeric_bearings: usize,
}

impl LabelAudit {
    pub fn scan(records: &[SilverRecord]) -> Self {
        let mut audit = LabelAudit {
            records: records.len(),
            ..LabelAudit::default()
        };

        for entry in records.iter().flat_map(|record| record.runway_entries().iter()) {
            audit.observe(entry);
        }

        audit
    }

    fn observe(&mut self, entry: &RunwayEntry) {
        self.entries += 1;

        if entry.runway() == Some(ALL_RUNWAYS_SENTINEL) {
            self.all_runways += 1;
        }

        let coordinates = entry.obstacle_coordinates().and_then(Value::as_str);
        if let Some(coordinates) = coordinates.filter(|c| !c.is_empty()) {
            if is_decimal_pair(coordinates) {
                self.coordinates_in_decimal += 1;
            } else {
                self.coordinates_to_convert += 1;
            }
        }

        match entry.obstacle_bearing() {
            Some(Value::Number(_)) => self.numeric_bearings += 1,
            Some(Value::String(text)) if !text.is_empty() && !is_plain_number(text) => {
                self.bearings_to_convert += 1;
            }
            Some(Value::Bool(true) | Value::Array(_) | Value::Object(_)) => self.odd_bearings += 1,
            _ => {}
        }
    }

    /// Whether a sanitizing pass would have anything to do
    pub fn has_issues(&self) -> bool {
        self.all_runways > 0
            || self.coordinates_to_convert > 0
            || self.bearings_to_convert > 0
            || self.odd_bearings > 0
    }
}

/// Digits once `.` and `-` are removed, e.g. `"-12.5"`.
fn is_plain_number(text: &str) -> bool {
    let digits: Vec<char> = text.chars().filter(|c| *c != '.' && *c != '-').collect();
    !digits.is_empty() && digits.iter().all(|c| c.is_numeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::normalize::sanitize_records;
    use crate::types::{NotamRecord, OBSTACLE_BEARING, OBSTACLE_COORDINATES};
    use serde_json::json;

    fn dataset() -> Vec<SilverRecord> {
        let obstacle = RunwayEntry::for_runway("ALL")
            .with(OBSTACLE_COORDINATES, "6449N14751W")
            .with(OBSTACLE_BEARING, "SW");
        let decimal = RunwayEntry::for_runway("02L")
            .with(OBSTACLE_COORDINATES, "64.8167, -147.8500")
            .with(OBSTACLE_BEARING, "225");
        vec![
            SilverRecord::new(NotamRecord::new("A1", "PAFA", "OBST CRANE"), vec![obstacle, decimal]),
            SilverRecord::new(NotamRecord::new("A2", "PAFA", "RWY 02L CLSD"), vec![RunwayEntry::for_runway("02L")]),
        ]
    }

    #[test]
    fn test_scan_counts_artifacts() {
        let audit = LabelAudit::scan(&dataset());
        assert_eq!(audit.records, 2);
        assert_eq!(audit.entries, 3);
        assert_eq!(audit.all_runways, 1);
        assert_eq!(audit.coordinates_to_convert, 1);
        assert_eq!(audit.coordinates_in_decimal, 1);
        // "225" is numeric text and needs no conversion
        assert_eq!(audit.bearings_to_convert, 1);
        assert_eq!(audit.numeric_bearings, 0);
        assert!(audit.has_issues());
    }

    #[test]
    fn test_scan_after_sanitizing_is_clean() {
        let mut records = dataset();
        sanitize_records(&mut records);

        let audit = LabelAudit::scan(&records);
        assert!(!audit.has_issues());
        assert_eq!(audit.coordinates_in_decimal, 2);
        assert_eq!(audit.numeric_bearings, 2);
    }

    #[test]
    fn test_non_text_fields_are_not_misread() {
        let entry = RunwayEntry::from_value(json!({
            "runway": 9,
            "obstacleCoordinates": 6449,
            "obstacleBearing": true
        }));
        let records = vec![SilverRecord::new(NotamRecord::new("A3", "PAFA", "OBST"), vec![entry])];

        let audit = LabelAudit::scan(&records);
        assert_eq!(audit.all_runways, 0);
        assert_eq!(audit.coordinates_to_convert, 0);
        assert_eq!(audit.odd_bearings, 1);
        assert!(audit.has_issues());
    }

    #[test]
    fn test_plain_number_detection() {
        assert!(is_plain_number("-12.5"));
        assert!(is_plain_number("270"));
        assert!(!is_plain_number("NE"));
        assert!(!is_plain_number("-"));
    }
}
