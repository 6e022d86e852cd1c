//! Configuration module for Thread-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use thread_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetching {} pages at a time", config.crawler.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, ListingConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_selector, validate, validate_crawler_config};
