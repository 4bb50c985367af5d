// Record processing: relevance filtering of raw NOTAMs and normalization of extracted labels

pub mod normalize;
pub mod relevance;
