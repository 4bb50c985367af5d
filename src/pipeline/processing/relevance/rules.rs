use once_cell::sync::Lazy;
use regex::Regex;

use super::RelevanceReason;
use crate::text::strip;

// Keywords that indicate potential relevance to runway performance
pub const RUNWAY_KEYWORDS: &[&str] = &["RWY", "RUNWAY", "THR", "THRESHOLD"];
pub const CONTAMINATION_KEYWORDS: &[&str] = &[
    "FICON",
    "CONTAMINATED",
    "ICE",
    "SNOW",
    "SN",
    "SLUSH",
    "WATER",
    "WET",
    "COMPACTED",
    "BRAKING",
];
pub const OBSTACLE_KEYWORDS: &[&str] = &["OBST", "OBSTACLE", "CRANE", "TOWER", "HTG"];
pub const CLOSURE_KEYWORDS: &[&str] = &["CLSD", "CLOSED", "DSPLCD", "DISPLACED"];

// Navigation and procedure notices are excluded unless they touch the runway surface
pub const NAVAID_KEYWORDS: &[&str] = &["ILS", "VOR", "GPS", "NDB", "DME", "RNAV", "LOC", "GS", "PAPI", "VASI"];
pub const PROCEDURE_KEYWORDS: &[&str] = &["APCH", "APPROACH", "DEP", "DEPARTURE", "SID", "STAR", "IAP"];

/// Surface conditions that keep a runway-referencing notice relevant no matter
/// what navigation content it carries.
pub const SURFACE_IMPACT_KEYWORDS: &[&str] = &["DSPLCD", "CLSD", "CLOSED", "FICON", "CONTAMINATED"];

/// Equipment-status phrases: U/S (unserviceable), OTS (out of service), etc.
pub const EQUIPMENT_STATUS_PHRASES: &[&str] = &["U/S", "OTS", "NOT AVBL", "INOP", "ON TEST", "MAINT"];

/// Surface conditions that veto the equipment-outage exclusion. Unlike
/// `SURFACE_IMPACT_KEYWORDS` this set has no `CLOSED`.
pub const EQUIPMENT_OUTAGE_VETO: &[&str] = &["DSPLCD", "CLSD", "FICON", "CONTAMINATED"];

static TAXIWAY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bTWY\b").expect("taxiway pattern compiles"));
static RUNWAY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRWY\b").expect("runway pattern compiles"));

/// NOTAM text prepared once for every rule: the raw text for token matching
/// and an upper-cased copy for substring keyword checks.
#[derive(Debug)]
pub struct NoticeText<'a> {
    pub raw: &'a str,
    pub upper: String,
}

impl<'a> NoticeText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            upper: raw.to_uppercase(),
        }
    }

    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.upper.contains(kw))
    }

    pub fn has_runway_reference(&self) -> bool {
        self.upper.contains("RWY") || self.upper.contains("RUNWAY")
    }
}

/// One step of the precedence chain. Rules are evaluated in table order and
/// the first whose predicate holds decides the classification.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceRule {
    pub reason: RelevanceReason,
    pub relevant: bool,
    pub applies: fn(&NoticeText<'_>) -> bool,
}

pub const RULES: [RelevanceRule; 5] = [
    RelevanceRule {
        reason: RelevanceReason::EmptyText,
        relevant: false,
        applies: is_empty,
    },
    RelevanceRule {
        reason: RelevanceReason::TaxiwayOnly,
        relevant: false,
        applies: is_taxiway_only,
    },
    RelevanceRule {
        reason: RelevanceReason::NavigationOnly,
        relevant: false,
        applies: is_navigation_only,
    },
    RelevanceRule {
        reason: RelevanceReason::HasRelevantKeyword,
        relevant: true,
        applies: has_inclusion_keyword,
    },
    RelevanceRule {
        reason: RelevanceReason::NoRelevantKeywords,
        relevant: false,
        applies: always,
    },
];

fn is_empty(notice: &NoticeText<'_>) -> bool {
    strip(notice.raw).is_empty()
}

/// A whole-word `TWY` with no whole-word `RWY` after it on the same line.
///
/// This is a lookahead heuristic, not a clause parser: a `RWY` earlier in the
/// text does not count, and the lookahead stops at a line break.
pub fn is_taxiway_only(notice: &NoticeText<'_>) -> bool {
    TAXIWAY_TOKEN.find_iter(notice.raw).any(|taxiway| {
        let rest = &notice.raw[taxiway.end()..];
        let rest_of_line = rest.split('\n').next().unwrap_or("");
        !RUNWAY_TOKEN.is_match(rest_of_line)
    })
}

pub fn is_navigation_only(notice: &NoticeText<'_>) -> bool {
    let has_runway = notice.has_runway_reference();

    if has_runway && notice.contains_any(SURFACE_IMPACT_KEYWORDS) {
        return false;
    }

    let has_nav = notice.contains_any(NAVAID_KEYWORDS) || notice.contains_any(PROCEDURE_KEYWORDS);
    if !has_nav {
        return false;
    }

    if !has_runway {
        return true;
    }

    // Equipment outage that mentions a runway only in passing
    notice.contains_any(EQUIPMENT_STATUS_PHRASES) && !notice.contains_any(EQUIPMENT_OUTAGE_VETO)
}

pub fn has_inclusion_keyword(notice: &NoticeText<'_>) -> bool {
    [RUNWAY_KEYWORDS, CONTAMINATION_KEYWORDS, OBSTACLE_KEYWORDS, CLOSURE_KEYWORDS]
        .iter()
        .any(|group| notice.contains_any(group))
}

fn always(_: &NoticeText<'_>) -> bool {
    true
}
