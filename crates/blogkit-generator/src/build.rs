//! Build orchestration.
//!
//! Coordinates the full build: collect posts, write the sitemap and
//! robots.txt, render one preview image per published post, and write the
//! `_headers` file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use blogkit_core::{Config, is_nested_path};
use blogkit_og::{CardTemplate, FontProvider, OgError, OgImageRenderer};
use chrono::Utc;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    artifact::{Artifact, headers_file},
    collector::{CollectorError, PostCollector},
    site::SiteArtifacts,
};

/// Name of the static-host header rules file.
pub const HEADERS_FILE: &str = "_headers";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Preview image rendering error.
    #[error("preview image error for `{slug}`: {source}")]
    Og {
        slug: String,
        #[source]
        source: OgError,
    },

    /// Fonts could not be resolved.
    #[error("preview fonts unavailable: {0}")]
    Fonts(#[source] OgError),

    /// The preview image directory does not stay inside the output directory.
    #[error("preview image directory `{0}` must be inside the output directory")]
    OgDir(String),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Posts in the collection, drafts included.
    pub posts: usize,

    /// Draft posts left out of every artifact.
    pub drafts: usize,

    /// Sitemap entries written.
    pub sitemap_urls: usize,

    /// Preview images rendered.
    pub images: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Writes every artifact of a blog into an output directory.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    posts_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, posts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            posts_dir: posts_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Builder for the directories named in the configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let posts_dir = PathBuf::from(&config.content.posts_dir);
        let output_dir = PathBuf::from(&config.build.output_dir);
        Self::new(config, posts_dir, output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    ///
    /// Fonts are resolved from `fonts` once, before any image is rendered.
    pub fn build(&self, fonts: &dyn FontProvider) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            posts = %self.posts_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // 1. Collect posts
        let posts = PostCollector::new(&self.posts_dir).collect()?;
        stats.posts = posts.len();
        stats.drafts = posts.iter().filter(|p| p.draft).count();
        let site = SiteArtifacts::from_config(&self.config, posts);

        // 2. Prepare output
        self.prepare_output(&site)?;

        // 3. Sitemap and robots.txt
        let entries = site.sitemap_entries_at(Utc::now());
        stats.sitemap_urls = entries.len();
        self.write_artifact(&SiteArtifacts::sitemap_from(&entries))?;
        self.write_artifact(&site.robots())?;

        // 4. Preview images
        stats.images = self.generate_images(&site, fonts)?;

        // 5. Header rules
        if self.config.build.headers_file {
            let path = self.output_dir.join(HEADERS_FILE);
            write_file(&path, headers_file(&site.header_rules()).as_bytes())?;
            debug!(path = %path.display(), "wrote header rules");
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            drafts = stats.drafts,
            sitemap_urls = stats.sitemap_urls,
            images = stats.images,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Create the output directory and clear stale preview images.
    ///
    /// The rest of the output directory is left alone so the artifacts can
    /// be written next to a site built by another tool.
    fn prepare_output(&self, site: &SiteArtifacts) -> Result<()> {
        if !is_nested_path(site.og_dir()) {
            return Err(BuildError::OgDir(site.og_dir().to_string()));
        }
        let og_dir = self.output_dir.join(site.og_dir());

        if og_dir.exists() {
            debug!(dir = %og_dir.display(), "cleaning preview image directory");
            fs::remove_dir_all(&og_dir).map_err(|source| BuildError::Io {
                path: og_dir.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&og_dir).map_err(|source| BuildError::Io {
            path: og_dir.clone(),
            source,
        })?;
        Ok(())
    }

    /// Render and write preview images in parallel.
    fn generate_images(&self, site: &SiteArtifacts, fonts: &dyn FontProvider) -> Result<usize> {
        let posts: Vec<_> = site.og_posts().collect();
        if posts.is_empty() {
            return Ok(0);
        }

        let template = CardTemplate::from_config(&self.config);
        let renderer = OgImageRenderer::from_provider(template, fonts).map_err(BuildError::Fonts)?;

        info!(count = posts.len(), "rendering preview images");

        posts
            .par_iter()
            .map(|post| {
                let artifact = site.og_image(&renderer, post).map_err(|source| BuildError::Og {
                    slug: post.slug.clone(),
                    source,
                })?;
                self.write_artifact(&artifact)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(posts.len())
    }

    fn write_artifact(&self, artifact: &Artifact) -> Result<()> {
        let path = self.output_dir.join(artifact.relative_path());
        write_file(&path, &artifact.body)?;
        debug!(route = %artifact.route, bytes = artifact.body.len(), "wrote artifact");
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let io_error = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use blogkit_og::{FontSet, StaticFontProvider};
    use tempfile::TempDir;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.site.base_url = Some("https://blog.example.com".to_string());
        config.site.author = "Jane Doe".to_string();
        config
    }

    fn fonts() -> StaticFontProvider {
        StaticFontProvider::new(FontSet::new(Vec::<u8>::new(), Vec::<u8>::new()))
    }

    fn write_post(dir: &Path, name: &str, frontmatter: &str) {
        fs::write(dir.join(name), format!("---\n{frontmatter}\n---\nBody\n")).unwrap();
    }

    #[test]
    fn test_build_empty_blog() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let builder = Builder::new(test_config(), posts_dir.path(), output_dir.path());
        let stats = builder.build(&fonts()).unwrap();

        assert_eq!(stats.posts, 0);
        assert_eq!(stats.sitemap_urls, 4);
        assert_eq!(stats.images, 0);
        assert!(output_dir.path().join("sitemap.xml").exists());
        assert!(output_dir.path().join("robots.txt").exists());
        assert!(output_dir.path().join(HEADERS_FILE).exists());
    }

    #[test]
    fn test_build_with_posts() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_post(posts_dir.path(), "hello.md", "title: Hello\npubDate: 2024-01-01\ntags: [rust]");
        write_post(
            posts_dir.path(),
            "wip.md",
            "title: WIP\npubDate: 2024-02-01\ndraft: true",
        );

        let builder = Builder::new(test_config(), posts_dir.path(), output_dir.path());
        let stats = builder.build(&fonts()).unwrap();

        assert_eq!(stats.posts, 2);
        assert_eq!(stats.drafts, 1);
        assert_eq!(stats.images, 1);
        // 4 static + 1 post + 1 tag
        assert_eq!(stats.sitemap_urls, 6);

        let og = output_dir.path().join("og");
        assert!(og.join("hello.png").exists());
        assert!(!og.join("wip.png").exists());

        let headers = fs::read_to_string(output_dir.path().join(HEADERS_FILE)).unwrap();
        assert!(headers.contains("/og/*\n  Content-Type: image/png"));
    }

    #[test]
    fn test_build_removes_stale_images_only() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        fs::create_dir_all(output_dir.path().join("og")).unwrap();
        fs::write(output_dir.path().join("og/removed.png"), b"old").unwrap();
        fs::write(output_dir.path().join("index.html"), b"<html>").unwrap();

        let builder = Builder::new(test_config(), posts_dir.path(), output_dir.path());
        builder.build(&fonts()).unwrap();

        assert!(!output_dir.path().join("og/removed.png").exists());
        assert!(output_dir.path().join("index.html").exists());
    }

    #[test]
    fn test_headers_file_can_be_disabled() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let mut config = test_config();
        config.build.headers_file = false;

        Builder::new(config, posts_dir.path(), output_dir.path())
            .build(&fonts())
            .unwrap();

        assert!(!output_dir.path().join(HEADERS_FILE).exists());
    }

    #[test]
    fn test_og_dir_outside_output_is_rejected() {
        let root = TempDir::new().unwrap();
        let site_dir = root.path().join("site");
        let output_dir = site_dir.join("dist");
        let posts_dir = site_dir.join("posts");
        fs::create_dir_all(&output_dir).unwrap();
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(site_dir.join("index.html"), b"<html>").unwrap();

        for og_dir in ["..", "og/../..", "../og", "."] {
            let mut config = test_config();
            config.build.og_dir = og_dir.to_string();

            let err = Builder::new(config, &posts_dir, &output_dir)
                .build(&fonts())
                .unwrap_err();
            assert!(matches!(err, BuildError::OgDir(_)), "{og_dir}: {err}");
        }

        assert!(site_dir.join("index.html").exists());
        assert!(posts_dir.exists());
    }

    #[test]
    fn test_sitemap_url_count_matches_written_sitemap() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_post(posts_dir.path(), "a.md", "title: A\npubDate: 2024-01-01\ntags: [x, y]");
        write_post(posts_dir.path(), "b.md", "title: B\npubDate: 2024-01-02\ntags: [y]");

        let stats = Builder::new(test_config(), posts_dir.path(), output_dir.path())
            .build(&fonts())
            .unwrap();

        let xml = fs::read_to_string(output_dir.path().join("sitemap.xml")).unwrap();
        assert_eq!(stats.sitemap_urls, 8);
        assert_eq!(xml.matches("<url>").count(), stats.sitemap_urls);
    }

    #[test]
    fn test_invalid_post_fails_build() {
        let posts_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_post(posts_dir.path(), "bad.md", "title: Missing date");

        let err = Builder::new(test_config(), posts_dir.path(), output_dir.path())
            .build(&fonts())
            .unwrap_err();
        assert!(matches!(err, BuildError::Collector(_)));
    }
}
