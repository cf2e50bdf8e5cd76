//! Application configuration module.
//!
//! TOML config for service endpoints, catalog defaults and the
//! query timeout.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ProfilePaths, parse_base_url};
