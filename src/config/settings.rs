use crate::config::types::MergedConfig;
use crate::error::{Result, RuuError};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding a fixed production URL.
/// Takes precedence over any config file value.
pub const PRODUCTION_URL_ENV: &str = "RUU_PRODUCTION_URL";

/// Explicit values that beat both the environment and config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub production_url: Option<String>,
	pub site_url: Option<String>,
	pub document_root: Option<PathBuf>,
}

/// Where the resolved production URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductionUrlOrigin {
	/// Passed in directly (`Settings::new` or an override flag).
	Explicit,
	/// The `RUU_PRODUCTION_URL` environment variable.
	Env,
	/// A config file in the cascade.
	File(PathBuf),
	/// Nothing set it.
	Unset,
}

/// Fully resolved, immutable rewrite settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	/// Production base URL without trailing slash. Empty disables rewriting.
	pub production_base_url: String,

	/// Hostname of the development site, no scheme or port. May be empty.
	pub site_host: String,

	/// Local directory that asset paths are checked against.
	pub document_root: PathBuf,

	pub production_url_origin: ProductionUrlOrigin,
}

impl Settings {
	/// Build settings from raw values, normalizing the production URL and
	/// reducing the site URL to its host.
	pub fn new(production_url: &str, site_url: &str, document_root: impl Into<PathBuf>) -> Result<Self> {
		Ok(Settings {
			production_base_url: normalize_production_url(production_url)?,
			site_host: site_host(site_url),
			document_root: document_root.into(),
			production_url_origin: ProductionUrlOrigin::Explicit,
		})
	}

	/// Resolve settings from merged config, the environment and explicit overrides.
	///
	/// Precedence is overrides, then `RUU_PRODUCTION_URL`, then config files.
	/// The document root defaults to the most specific config's directory,
	/// falling back to `start_dir`.
	pub fn resolve(merged: &MergedConfig, overrides: &Overrides, start_dir: &Path) -> Result<Self> {
		let env_production = std::env::var(PRODUCTION_URL_ENV).ok();
		Self::resolve_with_env(merged, overrides, start_dir, env_production.as_deref())
	}

	/// Resolve settings from config files alone, ignoring the environment.
	///
	/// Used to check that the files themselves hold valid values.
	pub fn resolve_files(merged: &MergedConfig, start_dir: &Path) -> Result<Self> {
		Self::resolve_with_env(merged, &Overrides::default(), start_dir, None)
	}

	fn resolve_with_env(
		merged: &MergedConfig,
		overrides: &Overrides,
		start_dir: &Path,
		env_production: Option<&str>,
	) -> Result<Self> {
		let (production_url, origin) = if let Some(ref url) = overrides.production_url {
			(url.as_str(), ProductionUrlOrigin::Explicit)
		} else if let Some(url) = env_production.filter(|v| !v.trim().is_empty()) {
			(url, ProductionUrlOrigin::Env)
		} else if let Some(ref sourced) = merged.production_url {
			(
				sourced.value.as_str(),
				ProductionUrlOrigin::File(sourced.source.clone()),
			)
		} else {
			("", ProductionUrlOrigin::Unset)
		};

		let site_url = overrides
			.site_url
			.as_deref()
			.or(merged.site_url.as_ref().map(|s| s.value.as_str()))
			.unwrap_or_default();

		let document_root = match overrides.document_root {
			Some(ref root) => start_dir.join(root),
			None => merged
				.document_root
				.as_ref()
				.map(|s| s.value.clone())
				.or_else(|| merged.base_dir.clone())
				.unwrap_or_else(|| start_dir.to_path_buf()),
		};

		Ok(Settings {
			production_url_origin: origin,
			..Settings::new(production_url, site_url, document_root)?
		})
	}

	/// Whether rewriting is enabled at all.
	pub fn is_active(&self) -> bool {
		!self.production_base_url.is_empty()
	}
}

/// Trim whitespace and trailing slashes, then check the URL is absolute http(s).
///
/// An empty result is valid and means the feature is disabled.
pub fn normalize_production_url(raw: &str) -> Result<String> {
	let trimmed = raw.trim().trim_end_matches('/');
	if trimmed.is_empty() {
		return Ok(String::new());
	}

	let parsed = Url::parse(trimmed).map_err(|e| RuuError::InvalidProductionUrl {
		url: raw.to_string(),
		reason: e.to_string(),
	})?;

	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(RuuError::InvalidProductionUrl {
			url: raw.to_string(),
			reason: format!("unsupported scheme `{}`", parsed.scheme()),
		});
	}

	Ok(trimmed.to_string())
}

/// Host component of a site URL as written, or an empty string if it has none.
///
/// The URL is validated by parsing, but the host is taken from the original
/// text so its case and Unicode form match what pages contain.
pub fn site_host(site_url: &str) -> String {
	let site_url = site_url.trim();
	if !Url::parse(site_url).is_ok_and(|url| url.host_str().is_some()) {
		return String::new();
	}

	let Some((_, rest)) = site_url.split_once("://") else {
		return String::new();
	};

	let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
	let host_port = authority
		.rsplit_once('@')
		.map_or(authority, |(_, host_port)| host_port);

	let host = if host_port.starts_with('[') {
		// IPv6 literal keeps its brackets
		host_port.split_inclusive(']').next().unwrap_or_default()
	} else {
		host_port.split(':').next().unwrap_or_default()
	};

	host.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::Sourced;

	fn sourced<T>(value: T) -> Option<Sourced<T>> {
		Some(Sourced {
			value,
			source: PathBuf::from("/srv/.ruu.toml"),
		})
	}

	#[test]
	fn test_normalize_strips_trailing_slashes() {
		assert_eq!(
			normalize_production_url(" https://cdn.example.com// ").unwrap(),
			"https://cdn.example.com"
		);
		assert_eq!(
			normalize_production_url("https://cdn.example.com/media/").unwrap(),
			"https://cdn.example.com/media"
		);
	}

	#[test]
	fn test_normalize_empty_is_disabled() {
		assert_eq!(normalize_production_url("").unwrap(), "");
		assert_eq!(normalize_production_url("  /  ").unwrap(), "");
	}

	#[test]
	fn test_normalize_rejects_relative_and_foreign_schemes() {
		assert!(matches!(
			normalize_production_url("cdn.example.com"),
			Err(RuuError::InvalidProductionUrl { .. })
		));
		assert!(matches!(
			normalize_production_url("javascript:alert(1)"),
			Err(RuuError::InvalidProductionUrl { .. })
		));
	}

	#[test]
	fn test_site_host() {
		assert_eq!(site_host("http://dev.example.com"), "dev.example.com");
		assert_eq!(site_host("https://dev.example.com:8080/blog/"), "dev.example.com");
		assert_eq!(site_host("http://localhost/wordpress"), "localhost");
		assert_eq!(site_host("dev.example.com"), "");
		assert_eq!(site_host(""), "");
		assert_eq!(site_host("file:///var/www"), "");
	}

	#[test]
	fn test_site_host_keeps_host_as_written() {
		assert_eq!(site_host("http://Dev.Example.com"), "Dev.Example.com");
		assert_eq!(site_host("http://bücher.example/shop"), "bücher.example");
		assert_eq!(site_host("http://user:pw@Dev.Example.com:8080/"), "Dev.Example.com");
		assert_eq!(site_host("http://[::1]:8080/"), "[::1]");
		assert_eq!(site_host("http://dev.example.com?p=1"), "dev.example.com");
	}

	#[test]
	fn test_origin_tracks_winning_source() {
		let merged = MergedConfig {
			production_url: sourced("https://from-config.example.com".to_string()),
			..Default::default()
		};
		let start = Path::new("/work");

		let from_file =
			Settings::resolve_with_env(&merged, &Overrides::default(), start, None).unwrap();
		assert_eq!(
			from_file.production_url_origin,
			ProductionUrlOrigin::File(PathBuf::from("/srv/.ruu.toml"))
		);

		let from_env = Settings::resolve_with_env(
			&merged,
			&Overrides::default(),
			start,
			Some("https://from-env.example.com"),
		)
		.unwrap();
		assert_eq!(from_env.production_url_origin, ProductionUrlOrigin::Env);

		let overrides = Overrides {
			production_url: Some("https://from-flag.example.com".to_string()),
			..Default::default()
		};
		let from_flag = Settings::resolve_with_env(
			&merged,
			&overrides,
			start,
			Some("https://from-env.example.com"),
		)
		.unwrap();
		assert_eq!(from_flag.production_url_origin, ProductionUrlOrigin::Explicit);

		let unset = Settings::resolve_with_env(
			&MergedConfig::default(),
			&Overrides::default(),
			start,
			None,
		)
		.unwrap();
		assert_eq!(unset.production_url_origin, ProductionUrlOrigin::Unset);
	}

	#[test]
	fn test_resolve_files_ignores_environment() {
		let merged = MergedConfig {
			production_url: sourced("https://from-config.example.com".to_string()),
			..Default::default()
		};
		// SAFETY: single-threaded test context; the variable is restored below
		unsafe {
			std::env::set_var(PRODUCTION_URL_ENV, "not a url");
		}
		let result = Settings::resolve_files(&merged, Path::new("/work"));
		unsafe {
			std::env::remove_var(PRODUCTION_URL_ENV);
		}

		let settings = result.unwrap();
		assert_eq!(settings.production_base_url, "https://from-config.example.com");
	}

	#[test]
	fn test_resolve_defaults() {
		let merged = MergedConfig::default();
		let settings =
			Settings::resolve_with_env(&merged, &Overrides::default(), Path::new("/work"), None)
				.unwrap();

		assert!(!settings.is_active());
		assert_eq!(settings.site_host, "");
		assert_eq!(settings.document_root, PathBuf::from("/work"));
	}

	#[test]
	fn test_resolve_from_config() {
		let merged = MergedConfig {
			production_url: sourced("https://cdn.example.com/".to_string()),
			site_url: sourced("http://dev.example.com".to_string()),
			base_dir: Some(PathBuf::from("/srv")),
			..Default::default()
		};
		let settings =
			Settings::resolve_with_env(&merged, &Overrides::default(), Path::new("/work"), None)
				.unwrap();

		assert!(settings.is_active());
		assert_eq!(settings.production_base_url, "https://cdn.example.com");
		assert_eq!(settings.site_host, "dev.example.com");
		assert_eq!(settings.document_root, PathBuf::from("/srv"));
	}

	#[test]
	fn test_env_beats_config_and_overrides_beat_env() {
		let merged = MergedConfig {
			production_url: sourced("https://from-config.example.com".to_string()),
			document_root: sourced(PathBuf::from("/srv/public")),
			..Default::default()
		};

		let settings = Settings::resolve_with_env(
			&merged,
			&Overrides::default(),
			Path::new("/work"),
			Some("https://from-env.example.com"),
		)
		.unwrap();
		assert_eq!(settings.production_base_url, "https://from-env.example.com");
		assert_eq!(settings.document_root, PathBuf::from("/srv/public"));

		let overrides = Overrides {
			production_url: Some("https://from-flag.example.com".to_string()),
			document_root: Some(PathBuf::from("htdocs")),
			..Default::default()
		};
		let settings = Settings::resolve_with_env(
			&merged,
			&overrides,
			Path::new("/work"),
			Some("https://from-env.example.com"),
		)
		.unwrap();
		assert_eq!(settings.production_base_url, "https://from-flag.example.com");
		assert_eq!(settings.document_root, PathBuf::from("/work/htdocs"));
	}

	#[test]
	fn test_blank_env_does_not_mask_config() {
		let merged = MergedConfig {
			production_url: sourced("https://from-config.example.com".to_string()),
			..Default::default()
		};
		let settings = Settings::resolve_with_env(
			&merged,
			&Overrides::default(),
			Path::new("/work"),
			Some("  "),
		)
		.unwrap();
		assert_eq!(settings.production_base_url, "https://from-config.example.com");
	}

	#[test]
	fn test_empty_override_disables() {
		let merged = MergedConfig {
			production_url: sourced("https://from-config.example.com".to_string()),
			..Default::default()
		};
		let overrides = Overrides {
			production_url: Some(String::new()),
			..Default::default()
		};
		let settings =
			Settings::resolve_with_env(&merged, &overrides, Path::new("/work"), None).unwrap();
		assert!(!settings.is_active());
	}
}
