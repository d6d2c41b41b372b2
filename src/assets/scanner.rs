use crate::error::{Result, RuuError};
use regex::Regex;
use std::collections::HashSet;

/// Characters allowed between the host and the extension.
const PATH_CHARS: &str = r"[/.A-Za-z0-9_-]*";

/// Recognized image extensions. Lowercase only.
const EXTENSIONS: &str = r"\.(jpe?g|gif|png|svg)";

/// Finds image asset URLs pointing at a given host.
#[derive(Debug, Clone)]
pub struct AssetScanner {
	/// `None` when the host is empty; such a scanner never matches.
	pattern: Option<Regex>,
}

impl AssetScanner {
	/// Compile a scanner for `site_host` (hostname only, no scheme).
	///
	/// The host is matched literally. An empty host yields a scanner that
	/// finds nothing.
	pub fn new(site_host: &str) -> Result<Self> {
		if site_host.is_empty() {
			return Ok(AssetScanner { pattern: None });
		}

		let pattern = format!(
			"https?://{}{}{}",
			regex::escape(site_host),
			PATH_CHARS,
			EXTENSIONS
		);
		let regex = Regex::new(&pattern).map_err(|source| RuuError::InvalidPattern {
			pattern: pattern.clone(),
			source,
		})?;

		Ok(AssetScanner {
			pattern: Some(regex),
		})
	}

	/// All distinct matching URLs in `content`, in order of first appearance.
	pub fn scan<'a>(&self, content: &'a str) -> Vec<&'a str> {
		let Some(ref regex) = self.pattern else {
			return Vec::new();
		};

		let mut seen = HashSet::new();
		regex
			.find_iter(content)
			.map(|m| m.as_str())
			.filter(|url| seen.insert(*url))
			.collect()
	}

	/// Whether `url` as a whole is something `scan` would select.
	pub fn is_asset_url(&self, url: &str) -> bool {
		self.pattern
			.as_ref()
			.and_then(|regex| regex.find(url))
			.is_some_and(|m| m.start() == 0 && m.end() == url.len())
	}
}

/// Scan `content` for asset URLs on `site_host`.
///
/// Returns an empty list if the host is empty or cannot be turned into a pattern.
pub fn scan<'a>(content: &'a str, site_host: &str) -> Vec<&'a str> {
	match AssetScanner::new(site_host) {
		Ok(scanner) => scanner.scan(content),
		Err(e) => {
			tracing::debug!("Unable to build asset scanner for `{site_host}`: {e}");
			Vec::new()
		}
	}
}
