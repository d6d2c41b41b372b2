use crate::assets::local::LocalFiles;
use crate::assets::rewriter::Rewriter;

/// A responsive image candidate record whose URL can be rewritten.
///
/// Host records may carry any other fields; only the URL is touched.
pub trait SrcsetCandidate {
	fn url(&self) -> &str;
	fn set_url(&mut self, url: String);
}

/// One responsive image candidate: a URL plus its optional width/density descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcsetSource {
	pub url: String,

	/// E.g. `300w` or `2x`.
	pub descriptor: Option<String>,
}

impl SrcsetSource {
	pub fn new(url: impl Into<String>, descriptor: Option<&str>) -> Self {
		SrcsetSource {
			url: url.into(),
			descriptor: descriptor.map(str::to_string),
		}
	}
}

impl SrcsetCandidate for SrcsetSource {
	fn url(&self) -> &str {
		&self.url
	}

	fn set_url(&mut self, url: String) {
		self.url = url;
	}
}

/// Pass every candidate's URL through `rewriter`, leaving everything else alone.
pub fn rewrite_srcset<S, L>(sources: Vec<S>, rewriter: &Rewriter<L>) -> Vec<S>
where
	S: SrcsetCandidate,
	L: LocalFiles,
{
	sources
		.into_iter()
		.map(|mut source| {
			let url = rewriter.rewrite(source.url());
			source.set_url(url);
			source
		})
		.collect()
}

/// Split a `srcset` attribute value into its candidates.
pub fn parse_srcset(attr: &str) -> Vec<SrcsetSource> {
	attr.split(',')
		.map(str::trim)
		.filter(|candidate| !candidate.is_empty())
		.map(|candidate| match candidate.split_once(char::is_whitespace) {
			Some((url, descriptor)) => {
				let descriptor = descriptor.trim();
				SrcsetSource::new(url, (!descriptor.is_empty()).then_some(descriptor))
			}
			None => SrcsetSource::new(candidate, None),
		})
		.collect()
}

/// Join candidates back into a `srcset` attribute value.
pub fn format_srcset(sources: &[SrcsetSource]) -> String {
	sources
		.iter()
		.map(|source| match source.descriptor {
			Some(ref descriptor) => format!("{} {}", source.url, descriptor),
			None => source.url.clone(),
		})
		.collect::<Vec<_>>()
		.join(", ")
}
