//! blogkit Generator Library
//!
//! Build-time manifest generation for a blog.
//!
//! # Modules
//!
//! - [`collector`] - Post collection from the content directory
//! - [`taxonomy`] - Tag index over published posts
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`artifact`] - Generated files and their HTTP metadata
//! - [`site`] - Route resolution over a post collection
//! - [`build`] - Build orchestration

pub mod artifact;
pub mod build;
pub mod collector;
pub mod robots;
pub mod site;
pub mod sitemap;
pub mod taxonomy;

pub use artifact::{Artifact, ArtifactKind};
pub use build::{BuildError, BuildStats, Builder};
pub use collector::{CollectorError, PostCollector};
pub use robots::RobotsGenerator;
pub use site::{ROBOTS_ROUTE, Route, SITEMAP_ROUTE, SiteArtifacts};
pub use sitemap::{ChangeFreq, EntryKind, SitemapGenerator, SitemapUrl};
pub use taxonomy::TagIndex;
