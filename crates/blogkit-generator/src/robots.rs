//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers. The policy is
//! fixed; only the sitemap reference depends on the site URL.

use std::fmt::Write;

use blogkit_core::SiteUrl;
use tracing::debug;

const DISALLOW: &[&str] = &["/admin/", "/.well-known/", "/api/"];
const ALLOW_FILES: &[&str] = &["/favicon.ico", "/robots.txt", "/sitemap.xml"];
const NAMED_AGENTS: &[&str] = &["Googlebot", "Bingbot", "DuckDuckBot"];

/// Robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    site: SiteUrl,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(site: SiteUrl) -> Self {
        Self { site }
    }

    /// Generate robots.txt.
    pub fn generate(&self) -> String {
        debug!("generating robots.txt");

        let mut out = String::new();
        out.push_str("User-agent: *\nAllow: /\n");
        for path in DISALLOW {
            let _ = writeln!(out, "Disallow: {path}");
        }
        for path in ALLOW_FILES {
            let _ = writeln!(out, "Allow: {path}");
        }

        for agent in NAMED_AGENTS {
            let _ = write!(out, "\nUser-agent: {agent}\nAllow: /\n");
        }

        let _ = writeln!(out, "\nSitemap: {}", self.site.file("sitemap.xml"));
        out
    }
}
