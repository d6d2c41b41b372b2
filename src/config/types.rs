use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.ruu.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the upward directory walk at this file.
	#[serde(default)]
	pub root: bool,

	/// Production base URL that missing local assets are redirected to.
	/// An empty value disables rewriting entirely.
	pub production_url: Option<String>,

	/// URL of the local/development site. Only its host is used.
	pub site_url: Option<String>,

	/// Directory that relative asset paths are checked against.
	/// Relative values are resolved against the directory holding the config file.
	pub document_root: Option<PathBuf>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl LoadedConfig {
	/// Directory containing the config file.
	pub fn dir(&self) -> PathBuf {
		self.path
			.parent()
			.map(|p| p.to_path_buf())
			.unwrap_or_default()
	}
}

/// A single config value along with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
	pub value: T,
	pub source: PathBuf,
}

/// Merged configuration from every config file in the cascade.
///
/// Each field holds the value from the most specific file that set it.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	pub production_url: Option<Sourced<String>>,
	pub site_url: Option<Sourced<String>>,

	/// Already resolved against the directory of the file that set it.
	pub document_root: Option<Sourced<PathBuf>>,

	/// Directory of the most specific config file, if any was found.
	pub base_dir: Option<PathBuf>,

	/// Every file that contributed, most specific first.
	pub sources: Vec<PathBuf>,
}
