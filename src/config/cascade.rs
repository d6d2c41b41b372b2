use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, Sourced};
use crate::error::{Result, RuuError};
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".ruu.toml";

/// Environment variable that, if truthy, skips ~/.ruu.toml lookup.
pub const NO_USER_CONFIG_ENV: &str = "RUU_NO_USER_CONFIG";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.ruu.toml`
/// 2. Continue up the directory tree until a file with `root = true`
/// 3. Finally, check ~/.ruu.toml (unless `RUU_NO_USER_CONFIG` is truthy)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = discover_project_configs(start_dir)?;

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Walk up from `start_dir` collecting `.ruu.toml` files, stopping at a root config.
pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		current_dir = dir.parent();
	}

	Ok(configs)
}

/// Load the user's ~/.ruu.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	if is_env_truthy(NO_USER_CONFIG_ENV) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	// Already picked up by the directory walk (start dir below $HOME)
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
pub(crate) fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// For every field, the first config (most specific) that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig {
		base_dir: configs.first().map(LoadedConfig::dir),
		..Default::default()
	};

	for loaded in configs {
		merged.sources.push(loaded.path.clone());

		if merged.production_url.is_none()
			&& let Some(ref url) = loaded.config.production_url
		{
			merged.production_url = Some(Sourced {
				value: url.clone(),
				source: loaded.path.clone(),
			});
		}

		if merged.site_url.is_none()
			&& let Some(ref url) = loaded.config.site_url
		{
			merged.site_url = Some(Sourced {
				value: url.clone(),
				source: loaded.path.clone(),
			});
		}

		if merged.document_root.is_none()
			&& let Some(ref root) = loaded.config.document_root
		{
			merged.document_root = Some(Sourced {
				value: loaded.dir().join(root),
				source: loaded.path.clone(),
			});
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RuuError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
