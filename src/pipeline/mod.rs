// Curation pipeline stages

pub mod processing;

pub use processing::{normalize, relevance};
