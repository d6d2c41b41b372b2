//! Asset URL detection and rewriting.
//!
//! This module handles:
//! - Scanning text for image URLs on the development host
//! - Deciding per URL whether the asset exists under the local document root
//! - Rewriting missing assets to the production host, in page content and srcsets

pub mod local;
pub mod rewriter;
pub mod scanner;
pub mod srcset;
pub mod transform;

pub use local::{DocumentRoot, LocalFiles};
pub use rewriter::{RewriteDecision, Rewriter, relative_path, rewrite};
pub use scanner::{AssetScanner, scan};
pub use srcset::{SrcsetCandidate, SrcsetSource, format_srcset, parse_srcset, rewrite_srcset};
pub use transform::ContentTransformer;
