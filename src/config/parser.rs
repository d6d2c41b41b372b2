use crate::config::types::Config;
use crate::error::{Result, RuuError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| RuuError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	toml::from_str(content).map_err(|source| RuuError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(config.production_url.is_none());
		assert!(config.site_url.is_none());
		assert!(config.document_root.is_none());
	}

	#[test]
	fn test_parse_full_config() {
		let content = r#"
root = true
production-url = "https://cdn.example.com/"
site-url = "http://dev.example.com"
document-root = "public"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(
			config.production_url,
			Some("https://cdn.example.com/".to_string())
		);
		assert_eq!(config.site_url, Some("http://dev.example.com".to_string()));
		assert_eq!(config.document_root, Some(PathBuf::from("public")));
	}

	#[test]
	fn test_unknown_keys_are_ignored() {
		let content = r#"
production-url = "https://cdn.example.com"
something-else = 42
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();
		assert!(config.production_url.is_some());
	}

	#[test]
	fn test_parse_error_carries_path() {
		let path = PathBuf::from("broken.toml");
		let result = parse_config_str("production-url = ", &path);

		match result.unwrap_err() {
			RuuError::ConfigParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("broken.toml"));
			}
			other => panic!("Expected ConfigParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_wrong_type_is_rejected() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("root = \"yes\"", &path);
		assert!(result.is_err());
	}

	#[test]
	fn test_parse_config_file_missing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(".ruu.toml");

		match parse_config_file(&path).unwrap_err() {
			RuuError::ConfigReadError { path: p, .. } => assert_eq!(p, path),
			other => panic!("Expected ConfigReadError, got {other:?}"),
		}
	}
}
