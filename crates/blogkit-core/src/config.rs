//! Site configuration management.

use std::{
    fmt,
    path::{Component, Path},
};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Base URL used when the site configuration does not provide one.
pub const DEFAULT_BASE_URL: &str = "https://example.com";

/// Main configuration structure for blogkit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Social preview image settings.
    #[serde(default)]
    pub og: OgConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL for the site (e.g., "https://example.com").
    ///
    /// Falls back to [`DEFAULT_BASE_URL`] when absent or empty.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Display name shown in preview image footers. Defaults to the base URL host.
    #[serde(default)]
    pub name: Option<String>,

    /// Author display name.
    #[serde(default = "default_author")]
    pub author: String,
}

/// Where posts are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding post sources.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Subdirectory (and route prefix) for preview images.
    #[serde(default = "default_og_dir")]
    pub og_dir: String,

    /// Whether to emit a `_headers` file for static hosts.
    #[serde(default = "default_true")]
    pub headers_file: bool,
}

/// Social preview image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OgConfig {
    /// Font family name used in the rendered card.
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// URL of the regular (400) weight font program.
    #[serde(default = "default_regular_font_url")]
    pub regular_font_url: String,

    /// URL of the bold (700) weight font program.
    #[serde(default = "default_bold_font_url")]
    pub bold_font_url: String,

    /// Timeout for each font download, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

// Default value functions
fn default_author() -> String {
    "Anonymous".to_string()
}

fn default_posts_dir() -> String {
    "content/posts".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_og_dir() -> String {
    "og".to_string()
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_regular_font_url() -> String {
    "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-400-normal.ttf".to_string()
}

fn default_bold_font_url() -> String {
    "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-700-normal.ttf".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            name: None,
            author: default_author(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            og_dir: default_og_dir(),
            headers_file: true,
        }
    }
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            regular_font_url: default_regular_font_url(),
            bold_font_url: default_bold_font_url(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `BLOGKIT__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("BLOGKIT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.base_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            tracing::warn!(
                fallback = DEFAULT_BASE_URL,
                "site.base_url not set, using fallback"
            );
        }

        if self.content.posts_dir.trim().is_empty() {
            return Err(CoreError::config("content.posts_dir cannot be empty"));
        }

        if self.build.og_dir.trim_matches('/').is_empty() {
            return Err(CoreError::config("build.og_dir cannot be empty"));
        }

        if !is_nested_path(&self.build.og_dir) {
            return Err(CoreError::config(format!(
                "build.og_dir must be a directory inside the output directory, got `{}`",
                self.build.og_dir
            )));
        }

        if self.og.regular_font_url.is_empty() || self.og.bold_font_url.is_empty() {
            return Err(CoreError::config("og font URLs cannot be empty"));
        }

        if self.og.fetch_timeout_secs == 0 {
            return Err(CoreError::config("og.fetch_timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Resolve the canonical site URL, applying the fallback.
    pub fn site_url(&self) -> SiteUrl {
        SiteUrl::new(self.site.base_url.as_deref())
    }

    /// Name shown in preview image footers.
    pub fn site_name(&self) -> String {
        match self.site.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.site_url().host().to_string(),
        }
    }
}

/// Whether `path` names a directory strictly below the directory it is joined
/// onto: relative, no `..`, and at least one normal component.
///
/// Leading and trailing slashes are ignored, matching how `og_dir` is read.
pub fn is_nested_path(path: &str) -> bool {
    let path = Path::new(path.trim_matches('/'));
    let mut normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    normal
}

/// Normalized absolute site URL without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl(String);

impl SiteUrl {
    /// Normalize a configured base URL, falling back to [`DEFAULT_BASE_URL`].
    pub fn new(raw: Option<&str>) -> Self {
        let base = raw
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Self(base.to_string())
    }

    /// The base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL for a page path, always ending in `/`.
    ///
    /// `page("")` and `page("/")` both yield the home URL.
    pub fn page(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", self.0)
        } else {
            format!("{}/{path}/", self.0)
        }
    }

    /// Absolute URL for a file at the site root (no trailing slash).
    pub fn file(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    /// Host portion of the URL (scheme and path stripped).
    pub fn host(&self) -> &str {
        let rest = self
            .0
            .split_once("://")
            .map_or(self.0.as_str(), |(_, rest)| rest);
        rest.split('/').next().unwrap_or(rest)
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
