//! blogkit Core Library
//!
//! Core types, configuration, and error handling shared by the blogkit
//! manifest generators.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod post;

pub use config::{Config, DEFAULT_BASE_URL, SiteUrl, is_nested_path};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use post::PostRecord;
