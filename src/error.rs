use std::path::PathBuf;

/// Library-level structured errors for replace-uploads-url.
///
/// Only configuration loading and scanner construction can fail. The rewrite
/// operations themselves degrade to a safe default instead of returning errors.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RuuError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid production URL `{url}`: {reason}")]
	InvalidProductionUrl { url: String, reason: String },

	#[error("Invalid asset pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RuuError.
pub type Result<T> = std::result::Result<T, RuuError>;
