//! Route resolution over a post collection.
//!
//! [`SiteArtifacts`] ties the generators to one post collection and answers
//! which artifacts exist and at which routes. The build writes all of them;
//! the preview server resolves one per request.

use blogkit_core::{Config, PostRecord, SiteUrl, post::published};
use blogkit_og::{OgImageRenderer, Result as OgResult};
use chrono::{DateTime, Utc};

use crate::{
    artifact::{Artifact, ArtifactKind},
    robots::RobotsGenerator,
    sitemap::{SitemapGenerator, SitemapUrl, to_xml},
};

pub const SITEMAP_ROUTE: &str = "/sitemap.xml";
pub const ROBOTS_ROUTE: &str = "/robots.txt";

/// What a request path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Sitemap,
    Robots,
    OgImage(&'a PostRecord),
}

/// The artifacts of one post collection.
#[derive(Debug, Clone)]
pub struct SiteArtifacts {
    site: SiteUrl,
    og_dir: String,
    posts: Vec<PostRecord>,
}

impl SiteArtifacts {
    pub fn new(site: SiteUrl, og_dir: &str, posts: Vec<PostRecord>) -> Self {
        Self {
            site,
            og_dir: og_dir.trim_matches('/').to_string(),
            posts,
        }
    }

    pub fn from_config(config: &Config, posts: Vec<PostRecord>) -> Self {
        Self::new(config.site_url(), &config.build.og_dir, posts)
    }

    pub fn site(&self) -> &SiteUrl {
        &self.site
    }

    /// The full collection, drafts included.
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn sitemap(&self) -> Artifact {
        self.sitemap_at(Utc::now())
    }

    /// Sitemap, with `now` as the date of an empty blog.
    pub fn sitemap_at(&self, now: DateTime<Utc>) -> Artifact {
        Self::sitemap_from(&self.sitemap_entries_at(now))
    }

    pub fn sitemap_entries_at(&self, now: DateTime<Utc>) -> Vec<SitemapUrl> {
        SitemapGenerator::new(self.site.clone()).entries_at(&self.posts, now)
    }

    /// Sitemap artifact for entries already collected.
    pub fn sitemap_from(entries: &[SitemapUrl]) -> Artifact {
        Artifact::new(SITEMAP_ROUTE, ArtifactKind::Sitemap, to_xml(entries))
    }

    pub fn robots(&self) -> Artifact {
        let text = RobotsGenerator::new(self.site.clone()).generate();
        Artifact::new(ROBOTS_ROUTE, ArtifactKind::Robots, text)
    }

    /// Directory of the preview images, relative to the site root.
    pub fn og_dir(&self) -> &str {
        &self.og_dir
    }

    /// Image route of a post, e.g. `/og/hello.png`.
    pub fn og_route(&self, slug: &str) -> String {
        format!("/{}/{slug}.png", self.og_dir)
    }

    /// Route pattern matching every preview image, e.g. `/og/*`.
    pub fn og_pattern(&self) -> String {
        format!("/{}/*", self.og_dir)
    }

    /// Posts that get a preview image: the non-draft ones.
    pub fn og_posts(&self) -> impl Iterator<Item = &PostRecord> {
        published(&self.posts)
    }

    /// Render the preview image of `post`.
    pub fn og_image(&self, renderer: &OgImageRenderer, post: &PostRecord) -> OgResult<Artifact> {
        let png = renderer.render(&post.title, &post.tags)?;
        Ok(Artifact::new(
            self.og_route(&post.slug),
            ArtifactKind::OgImage,
            png,
        ))
    }

    /// Resolve a request path. Drafts and unknown slugs resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<Route<'_>> {
        match path {
            SITEMAP_ROUTE => return Some(Route::Sitemap),
            ROBOTS_ROUTE => return Some(Route::Robots),
            _ => {}
        }

        let slug = path
            .strip_prefix('/')?
            .strip_prefix(self.og_dir.as_str())?
            .strip_prefix('/')?
            .strip_suffix(".png")?;
        self.og_posts()
            .find(|p| p.slug == slug)
            .map(Route::OgImage)
    }

    /// `_headers` rules for every artifact kind.
    pub fn header_rules(&self) -> Vec<(String, ArtifactKind)> {
        vec![
            (SITEMAP_ROUTE.to_string(), ArtifactKind::Sitemap),
            (ROBOTS_ROUTE.to_string(), ArtifactKind::Robots),
            (self.og_pattern(), ArtifactKind::OgImage),
        ]
    }
}
