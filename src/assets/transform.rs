use crate::assets::local::{DocumentRoot, LocalFiles};
use crate::assets::rewriter::{RewriteDecision, Rewriter};
use crate::assets::scanner::AssetScanner;
use crate::assets::srcset::{SrcsetCandidate, rewrite_srcset};
use crate::config::Settings;
use crate::error::Result;
use std::borrow::Cow;

/// Rewrites development-host asset URLs in rendered output.
///
/// Only exists when a production URL is configured; see [`ContentTransformer::activate`].
#[derive(Debug, Clone)]
pub struct ContentTransformer<L = DocumentRoot> {
	scanner: AssetScanner,
	rewriter: Rewriter<L>,
}

impl ContentTransformer<DocumentRoot> {
	/// Build a transformer checking assets under `settings.document_root`.
	///
	/// Returns `Ok(None)` when rewriting is disabled, in which case callers
	/// should pass content through untouched.
	pub fn activate(settings: &Settings) -> Result<Option<Self>> {
		Self::with_local_files(settings, DocumentRoot::new(&settings.document_root))
	}
}

impl<L: LocalFiles> ContentTransformer<L> {
	/// Like [`ContentTransformer::activate`] with a custom existence oracle.
	pub fn with_local_files(settings: &Settings, local: L) -> Result<Option<Self>> {
		if !settings.is_active() {
			tracing::debug!("No production URL configured, rewriting disabled");
			return Ok(None);
		}

		Ok(Some(ContentTransformer {
			scanner: AssetScanner::new(&settings.site_host)?,
			rewriter: Rewriter::new(settings.production_base_url.clone(), local),
		}))
	}

	/// Rewrite every locally missing asset URL in `content`.
	///
	/// Each distinct URL is decided once and then replaced everywhere it
	/// occurs. Content without qualifying URLs is returned borrowed.
	pub fn transform<'a>(&self, content: &'a str) -> Cow<'a, str> {
		let mut output = Cow::Borrowed(content);

		for url in self.scanner.scan(content) {
			if let RewriteDecision::Rewritten(new_url) = self.rewriter.decide(url) {
				tracing::debug!("Rewriting {url} -> {new_url}");
				output = Cow::Owned(output.replace(url, &new_url));
			}
		}

		output
	}

	/// Rewrite a single attachment URL without scanning.
	pub fn rewrite_url(&self, url: &str) -> String {
		self.rewriter.rewrite(url)
	}

	/// Decision for `url`, including whether the scanner would pick it up at all.
	pub fn decide(&self, url: &str) -> RewriteDecision {
		if !self.scanner.is_asset_url(url) {
			return RewriteDecision::NoMatch;
		}
		self.rewriter.decide(url)
	}

	/// Rewrite the URL of each responsive image candidate.
	pub fn rewrite_srcset<S: SrcsetCandidate>(&self, sources: Vec<S>) -> Vec<S> {
		rewrite_srcset(sources, &self.rewriter)
	}
}
