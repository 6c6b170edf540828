//! Application configuration module.
//!
//! Manages the optional TOML config file that overrides the index URL
//! and the User-Agent sent with every request.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
