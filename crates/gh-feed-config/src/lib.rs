//! Configuration and file management for gh-feed
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file lookup and loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{config_candidates, load_config_file};
pub use paths::{app_config_path, cache_dir, config_dir};
