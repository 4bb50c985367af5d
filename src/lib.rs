pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod text;
pub mod types;

pub mod observability;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
