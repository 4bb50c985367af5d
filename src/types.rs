use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::pipeline::processing::relevance::RelevanceReason;

/// A JSON object exactly as a collaborator wrote it, keys in their original order.
pub type Fields = Map<String, Value>;

// Wire names of the fields the curator reads or writes
pub const NOTAM_ID: &str = "notam_id";
pub const ICAO_LOCATION: &str = "icao_location";
pub const NOTAM_TEXT: &str = "notam_text";
pub const EXCLUSION_REASON: &str = "_exclusion_reason";
pub const RUNWAY_ENTRIES: &str = "runway_entries";
pub const RUNWAY: &str = "runway";
pub const RUNWAY_CLOSED: &str = "runwayClosed";
pub const OBSTACLE_COORDINATES: &str = "obstacleCoordinates";
pub const OBSTACLE_BEARING: &str = "obstacleBearing";
pub const CONFIDENCE: &str = "confidence";

const UNKNOWN: &str = "UNKNOWN";

/// Whether a JSON value counts as present: not null, false, zero or empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// A degree value as JSON; non-finite numbers have no JSON form and become null.
pub fn degrees_value(degrees: Option<f64>) -> Value {
    degrees.and_then(Number::from_f64).map_or(Value::Null, Value::Number)
}

/// Text for a field used as a label: strings as-is, other values as JSON, absent as `UNKNOWN`.
fn label(fields: &Fields, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// A NOTAM as produced by the downloader.
///
/// The record is kept as the object it arrived as. Only the text, id and
/// location are read, and the only write is the exclusion tag, so a record
/// written back out differs from its input by at most that one key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotamRecord {
    fields: Fields,
}

impl NotamRecord {
    pub fn new(id: impl Into<String>, icao_location: impl Into<String>, text: impl Into<String>) -> Self {
        let mut fields = Fields::new();
        fields.insert(NOTAM_ID.to_string(), Value::String(id.into()));
        fields.insert(ICAO_LOCATION.to_string(), Value::String(icao_location.into()));
        fields.insert(NOTAM_TEXT.to_string(), Value::String(text.into()));
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The notice body. Anything but a string reads as empty text.
    pub fn text(&self) -> &str {
        self.fields.get(NOTAM_TEXT).and_then(Value::as_str).unwrap_or("")
    }

    pub fn id(&self) -> String {
        label(&self.fields, NOTAM_ID)
    }

    pub fn location(&self) -> String {
        label(&self.fields, ICAO_LOCATION)
    }

    pub fn exclusion_reason(&self) -> Option<RelevanceReason> {
        self.fields
            .get(EXCLUSION_REASON)
            .and_then(Value::as_str)
            .and_then(RelevanceReason::from_name)
    }

    pub fn set_exclusion_reason(&mut self, reason: RelevanceReason) {
        self.fields
            .insert(EXCLUSION_REASON.to_string(), Value::String(reason.as_str().to_string()));
    }
}

/// Structured runway-performance data for a single runway, as the
/// extraction step emitted it.
///
/// Only `runway`, `obstacleCoordinates` and `obstacleBearing` are ever
/// rewritten; every other field (and any entry that is not an object at all)
/// passes through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunwayEntry(Value);

impl Default for RunwayEntry {
    fn default() -> Self {
        Self(Value::Object(Fields::new()))
    }
}

impl RunwayEntry {
    pub fn for_runway(runway: impl Into<String>) -> Self {
        Self::default().with(RUNWAY, Value::String(runway.into()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Builder-style `set`
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrite one field. Entries that are not objects are left alone.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(key.to_string(), value);
        }
    }

    pub fn runway(&self) -> Option<&str> {
        self.get(RUNWAY).and_then(Value::as_str)
    }

    pub fn obstacle_coordinates(&self) -> Option<&Value> {
        self.get(OBSTACLE_COORDINATES)
    }

    pub fn obstacle_bearing(&self) -> Option<&Value> {
        self.get(OBSTACLE_BEARING)
    }

    /// The extraction confidence when it was reported as a number
    pub fn confidence(&self) -> Option<f64> {
        self.get(CONFIDENCE).and_then(Value::as_f64)
    }
}

/// One line of the silver dataset: a NOTAM plus the runway entries the
/// external extraction step produced for it.
///
/// The line's fields are kept in their original order. When `runway_entries`
/// is an array, its items are lifted out so they can be sanitized in place and
/// are written back into the same slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilverRecord {
    fields: Fields,
    entries: Vec<RunwayEntry>,
}

impl SilverRecord {
    pub fn new(notam: NotamRecord, runway_entries: Vec<RunwayEntry>) -> Self {
        let mut fields = notam.fields;
        fields.insert(RUNWAY_ENTRIES.to_string(), Value::Array(Vec::new()));
        Self {
            fields,
            entries: runway_entries,
        }
    }

    pub fn from_fields(mut fields: Fields) -> Self {
        let entries = match fields.get_mut(RUNWAY_ENTRIES) {
            Some(Value::Array(items)) => std::mem::take(items).into_iter().map(RunwayEntry).collect(),
            _ => Vec::new(),
        };
        Self { fields, entries }
    }

    pub fn id(&self) -> String {
        label(&self.fields, NOTAM_ID)
    }

    pub fn runway_entries(&self) -> &[RunwayEntry] {
        &self.entries
    }

    pub fn runway_entries_mut(&mut self) -> &mut [RunwayEntry] {
        &mut self.entries
    }

    /// Lowest confidence across the runway entries. Entries without a numeric
    /// confidence count as fully confident, as does a record with no entries.
    pub fn min_confidence(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.confidence().unwrap_or(1.0))
            .fold(1.0_f64, f64::min)
    }

    fn has_entry_slot(&self) -> bool {
        matches!(self.fields.get(RUNWAY_ENTRIES), Some(Value::Array(_)))
    }
}

impl Serialize for SilverRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entry_slot = self.has_entry_slot();
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            if entry_slot && key == RUNWAY_ENTRIES {
                map.serialize_entry(key, &self.entries)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SilverRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Fields::deserialize(deserializer).map(Self::from_fields)
    }
}
