//! Configuration module for Catalogue Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalogue_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("catalogue.toml")).unwrap();
//! println!("Harvesting from: {}", config.crawler.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FailurePolicy, OutputConfig, SelectorConfig, UserAgentConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub(crate) use validation::compile_selector;
