/// Default locations for the curation datasets.
/// These mirror the layout the downloader and extraction collaborators write to.
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

pub const ALL_NOTAMS_FILE: &str = "all_notams.json";
pub const FILTERED_NOTAMS_FILE: &str = "filtered_notams.json";
pub const EXCLUDED_NOTAMS_FILE: &str = "excluded_notams.json";
pub const SILVER_DATASET_FILE: &str = "silver_dataset.jsonl";

pub const BACKUP_SUFFIX: &str = "bak";

/// Records whose weakest runway entry falls below this are considered low confidence.
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// How many ICAO locations the filter summary lists.
pub const TOP_LOCATIONS: usize = 10;

// Environment overrides (read after `.env` is loaded)
pub const ENV_DATA_DIR: &str = "NOTAM_DATA_DIR";
pub const ENV_LOG_DIR: &str = "NOTAM_LOG_DIR";

/// Runway designator the extraction step emits when it could not pick a runway.
pub const ALL_RUNWAYS_SENTINEL: &str = "ALL";
