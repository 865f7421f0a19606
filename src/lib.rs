pub mod apis;
pub mod common;
pub mod config;
pub mod convert;
pub mod envelope;
pub mod hours;
pub mod logging;
pub mod observability;
pub mod server;
pub mod validation;

// Ports and their adapters
pub mod app;
pub mod infra;
