//! Font resolution.
//!
//! Preview cards use one typeface in two weights. Fonts come from a
//! [`FontProvider`]; the default provider downloads them over HTTP. There is
//! no fallback font: if resolution fails, rendering fails.

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use blogkit_core::config::OgConfig;
use thiserror::Error;
use tracing::{debug, info};

/// Font resolution errors.
#[derive(Debug, Error)]
pub enum FontError {
    /// Transport-level failure.
    #[error("failed to fetch font {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("failed to fetch font {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The server answered with an empty body.
    #[error("font {url} is empty")]
    Empty { url: String },
}

/// Regular (400) and bold (700) font programs of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSet {
    pub regular: Arc<[u8]>,
    pub bold: Arc<[u8]>,
}

impl FontSet {
    pub fn new(regular: impl Into<Arc<[u8]>>, bold: impl Into<Arc<[u8]>>) -> Self {
        Self {
            regular: regular.into(),
            bold: bold.into(),
        }
    }
}

/// Supplies the fonts used to render preview images.
pub trait FontProvider: Send + Sync {
    fn load(&self) -> Result<FontSet, FontError>;
}

impl<P: FontProvider + ?Sized> FontProvider for Arc<P> {
    fn load(&self) -> Result<FontSet, FontError> {
        (**self).load()
    }
}

/// Downloads both weights over HTTP on every call.
#[derive(Debug, Clone)]
pub struct HttpFontProvider {
    regular_url: String,
    bold_url: String,
    timeout: Duration,
}

impl HttpFontProvider {
    pub fn new(regular_url: impl Into<String>, bold_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            regular_url: regular_url.into(),
            bold_url: bold_url.into(),
            timeout,
        }
    }

    /// Provider for the URLs in the `[og]` configuration section.
    pub fn from_config(config: &OgConfig) -> Self {
        Self::new(
            &config.regular_font_url,
            &config.bold_font_url,
            Duration::from_secs(config.fetch_timeout_secs),
        )
    }

    fn fetch(&self, client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FontError> {
        debug!(url, "fetching font");

        let request_error = |source| FontError::Request {
            url: url.to_string(),
            source,
        };

        let response = client.get(url).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FontError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(request_error)?;
        if bytes.is_empty() {
            return Err(FontError::Empty {
                url: url.to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

impl FontProvider for HttpFontProvider {
    fn load(&self) -> Result<FontSet, FontError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("blogkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FontError::Request {
                url: self.regular_url.clone(),
                source,
            })?;

        let regular = self.fetch(&client, &self.regular_url)?;
        let bold = self.fetch(&client, &self.bold_url)?;

        info!(
            regular_bytes = regular.len(),
            bold_bytes = bold.len(),
            "fetched preview fonts"
        );
        Ok(FontSet::new(regular, bold))
    }
}

/// Serves a fixed font set.
#[derive(Debug, Clone)]
pub struct StaticFontProvider(FontSet);

impl StaticFontProvider {
    pub fn new(fonts: FontSet) -> Self {
        Self(fonts)
    }
}

impl FontProvider for StaticFontProvider {
    fn load(&self) -> Result<FontSet, FontError> {
        Ok(self.0.clone())
    }
}

/// Resolves fonts from the inner provider once and reuses them.
///
/// Failures are not cached; the next call retries.
#[derive(Debug)]
pub struct CachedFontProvider<P> {
    inner: P,
    fonts: OnceLock<FontSet>,
}

impl<P: FontProvider> CachedFontProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            fonts: OnceLock::new(),
        }
    }
}

impl<P: FontProvider> FontProvider for CachedFontProvider<P> {
    fn load(&self) -> Result<FontSet, FontError> {
        if let Some(fonts) = self.fonts.get() {
            return Ok(fonts.clone());
        }

        let fonts = self.inner.load()?;
        Ok(self.fonts.get_or_init(|| fonts).clone())
    }
}
