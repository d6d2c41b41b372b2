use crate::assets::local::{DocumentRoot, LocalFiles};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Scheme, an optional literal `localhost/` segment, then everything up to
/// and including the next `/`.
static SITE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^https?://(localhost/|).+?/").expect("site prefix pattern is valid")
});

/// Outcome of deciding what to do with a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteDecision {
	/// Not an asset URL on the site host. Left alone.
	NoMatch,

	/// The asset exists under the document root. Left alone.
	LocalExists,

	/// The asset is missing locally and should be served from production.
	Rewritten(String),
}

impl RewriteDecision {
	/// The URL to emit in place of `original`.
	pub fn into_url(self, original: &str) -> String {
		match self {
			RewriteDecision::Rewritten(url) => url,
			RewriteDecision::NoMatch | RewriteDecision::LocalExists => original.to_string(),
		}
	}
}

/// Strip scheme, host and the host's base segment from `url`.
///
/// `http://dev.example.com/wp-content/a.png` becomes `wp-content/a.png` and
/// `http://localhost/localhost/img/x.jpg` becomes `img/x.jpg`. URLs without
/// a recognizable prefix are returned whole.
pub fn relative_path(url: &str) -> &str {
	match SITE_PREFIX.find(url) {
		Some(prefix) => &url[prefix.end()..],
		None => url,
	}
}

/// Redirects URLs of locally missing assets to the production host.
#[derive(Debug, Clone)]
pub struct Rewriter<L = DocumentRoot> {
	production_base_url: String,
	local: L,
}

impl<L: LocalFiles> Rewriter<L> {
	/// `production_base_url` is expected without a trailing slash.
	pub fn new(production_base_url: impl Into<String>, local: L) -> Self {
		Rewriter {
			production_base_url: production_base_url.into(),
			local,
		}
	}

	/// Decide between keeping `url` and pointing it at production.
	///
	/// Never returns [`RewriteDecision::NoMatch`]; host filtering is the
	/// scanner's job.
	pub fn decide(&self, url: &str) -> RewriteDecision {
		let relative = relative_path(url);

		if self.local.exists(relative) {
			tracing::trace!("Local asset found for {url}");
			return RewriteDecision::LocalExists;
		}

		RewriteDecision::Rewritten(format!("{}/{}", self.production_base_url, relative))
	}

	/// `url` unchanged if its asset exists locally, otherwise its production URL.
	pub fn rewrite(&self, url: &str) -> String {
		self.decide(url).into_url(url)
	}
}

/// One-shot rewrite of `url` against a filesystem document root.
pub fn rewrite(url: &str, production_base_url: &str, doc_root: &Path) -> String {
	Rewriter::new(production_base_url, DocumentRoot::new(doc_root)).rewrite(url)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	const PRODUCTION: &str = "https://cdn.example.com";

	fn nothing_local(_: &str) -> bool {
		false
	}

	fn everything_local(_: &str) -> bool {
		true
	}

	#[test]
	fn test_relative_path_strips_host() {
		assert_eq!(
			relative_path("http://dev.example.com/wp-content/uploads/2023/a.png"),
			"wp-content/uploads/2023/a.png"
		);
		assert_eq!(relative_path("https://dev.example.com/a.png"), "a.png");
	}

	#[test]
	fn test_relative_path_localhost_grammar() {
		assert_eq!(relative_path("http://localhost/localhost/img/x.jpg"), "img/x.jpg");
		// Subdirectory install under localhost drops the install segment
		assert_eq!(relative_path("http://localhost/wordpress/img/x.jpg"), "img/x.jpg");
		// No segment after `localhost/`: falls back to the plain host rule
		assert_eq!(relative_path("http://localhost/x.jpg"), "x.jpg");
	}

	#[test]
	fn test_relative_path_is_non_greedy() {
		assert_eq!(
			relative_path("http://dev.example.com/a/b/c.png"),
			"a/b/c.png"
		);
	}

	#[test]
	fn test_relative_path_fallback_for_unrecognized_urls() {
		assert_eq!(relative_path("/wp-content/a.png"), "/wp-content/a.png");
		assert_eq!(relative_path("//dev.example.com/a.png"), "//dev.example.com/a.png");
		assert_eq!(relative_path("http://dev.example.com"), "http://dev.example.com");
		assert_eq!(relative_path(""), "");
	}

	#[test]
	fn test_decide_rewrites_missing_assets() {
		let rewriter = Rewriter::new(PRODUCTION, nothing_local);
		assert_eq!(
			rewriter.decide("http://dev.example.com/wp-content/uploads/2023/a.png"),
			RewriteDecision::Rewritten(
				"https://cdn.example.com/wp-content/uploads/2023/a.png".to_string()
			)
		);
	}

	#[test]
	fn test_decide_keeps_local_assets() {
		let rewriter = Rewriter::new(PRODUCTION, everything_local);
		let url = "http://dev.example.com/wp-content/uploads/2023/a.png";

		assert_eq!(rewriter.decide(url), RewriteDecision::LocalExists);
		assert_eq!(rewriter.rewrite(url), url);
	}

	#[test]
	fn test_local_check_receives_relative_path() {
		let rewriter = Rewriter::new(PRODUCTION, |path: &str| path == "img/x.jpg");
		let url = "http://localhost/localhost/img/x.jpg";
		assert_eq!(rewriter.rewrite(url), url);
	}

	#[test]
	fn test_unrecognized_url_is_appended_whole() {
		let rewriter = Rewriter::new(PRODUCTION, nothing_local);
		assert_eq!(
			rewriter.rewrite("uploads/a.png"),
			"https://cdn.example.com/uploads/a.png"
		);
	}

	#[test]
	fn test_rewrite_against_filesystem() {
		let temp = tempfile::tempdir().unwrap();
		fs::create_dir_all(temp.path().join("wp-content/uploads")).unwrap();
		fs::write(temp.path().join("wp-content/uploads/here.png"), b"").unwrap();

		let here = "http://dev.example.com/wp-content/uploads/here.png";
		let gone = "http://dev.example.com/wp-content/uploads/gone.png";

		assert_eq!(rewrite(here, PRODUCTION, temp.path()), here);
		assert_eq!(
			rewrite(gone, PRODUCTION, temp.path()),
			"https://cdn.example.com/wp-content/uploads/gone.png"
		);
	}

	#[test]
	fn test_into_url() {
		assert_eq!(RewriteDecision::NoMatch.into_url("a"), "a");
		assert_eq!(RewriteDecision::LocalExists.into_url("a"), "a");
		assert_eq!(RewriteDecision::Rewritten("b".to_string()).into_url("a"), "b");
	}
}
