//! Normalization of extracted runway entries: coordinates and bearings to
//! canonical numeric form, plus removal of known labeling artifacts.

pub mod audit;
pub mod bearing;
pub mod coordinate;
pub mod sanitizer;

pub use audit::LabelAudit;
pub use bearing::{parse_bearing, parse_bearing_str};
pub use coordinate::{parse_coordinate, parse_single_coordinate, Coordinate, CoordinateFormat};
pub use sanitizer::{sanitize_entry, sanitize_record, sanitize_records, SanitizeStats};
