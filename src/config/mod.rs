//! Configuration loading and resolution for replace-uploads-url.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Config merging and resolution into immutable [`Settings`]

pub mod cascade;
pub mod parser;
pub mod settings;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, NO_USER_CONFIG_ENV, discover_configs, discover_project_configs,
	load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use settings::{
	Overrides, PRODUCTION_URL_ENV, ProductionUrlOrigin, Settings, normalize_production_url,
	site_host,
};
pub use types::{Config, LoadedConfig, MergedConfig, Sourced};
