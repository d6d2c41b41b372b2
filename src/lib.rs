//! Replace Uploads URL - rewrite development-host media URLs to a production host.
//!
//! This library provides:
//! - Configuration file parsing, cascade discovery and settings resolution
//! - Scanning rendered HTML for image URLs on the development host
//! - Rewriting URLs of assets missing from the local document root
//!
//! # Example
//!
//! ```no_run
//! use replace_uploads_url::assets::ContentTransformer;
//! use replace_uploads_url::config::{Overrides, Settings, load_merged_config};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let merged = load_merged_config(&cwd).unwrap();
//! let settings = Settings::resolve(&merged, &Overrides::default(), &cwd).unwrap();
//!
//! let html = r#"<img src="http://dev.example.com/wp-content/uploads/a.png">"#;
//! let output = match ContentTransformer::activate(&settings).unwrap() {
//!     Some(transformer) => transformer.transform(html).into_owned(),
//!     None => html.to_string(),
//! };
//! println!("{output}");
//! ```

pub mod assets;
pub mod config;
pub mod error;

pub use error::{Result, RuuError};
