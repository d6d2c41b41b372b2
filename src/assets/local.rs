use std::io::ErrorKind;
use std::path::PathBuf;

/// Existence oracle for site-relative asset paths.
pub trait LocalFiles {
	/// Whether a regular file exists at `relative_path`.
	///
	/// Implementations must not fail: any error counts as "absent".
	fn exists(&self, relative_path: &str) -> bool;
}

impl<F> LocalFiles for F
where
	F: Fn(&str) -> bool,
{
	fn exists(&self, relative_path: &str) -> bool {
		self(relative_path)
	}
}

/// Local document root on the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
	root: PathBuf,
}

impl DocumentRoot {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		DocumentRoot { root: root.into() }
	}

	/// Absolute location of a site-relative path under this root.
	pub fn resolve(&self, relative_path: &str) -> PathBuf {
		self.root.join(relative_path.trim_start_matches('/'))
	}
}

impl LocalFiles for DocumentRoot {
	fn exists(&self, relative_path: &str) -> bool {
		let path = self.resolve(relative_path);
		match std::fs::metadata(&path) {
			Ok(metadata) => metadata.is_file(),
			Err(e) if e.kind() == ErrorKind::NotFound => false,
			Err(e) => {
				tracing::debug!("Treating {} as missing: {e}", path.display());
				false
			}
		}
	}
}
