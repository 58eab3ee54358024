//! Generated files and the HTTP metadata they are served with.

use std::{fmt::Write, path::PathBuf};

/// The kinds of file blogkit generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Sitemap,
    Robots,
    OgImage,
}

impl ArtifactKind {
    pub const ALL: [Self; 3] = [Self::Sitemap, Self::Robots, Self::OgImage];

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Sitemap => "application/xml",
            Self::Robots => "text/plain",
            Self::OgImage => "image/png",
        }
    }

    pub fn cache_control(&self) -> &'static str {
        match self {
            Self::Sitemap => "public, max-age=3600",
            Self::Robots => "public, max-age=86400",
            Self::OgImage => "public, max-age=31536000, immutable",
        }
    }
}

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute URL path, e.g. `/og/hello.png`.
    pub route: String,
    pub kind: ArtifactKind,
    pub body: Vec<u8>,
}

impl Artifact {
    pub fn new(route: impl Into<String>, kind: ArtifactKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            route: route.into(),
            kind,
            body: body.into(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    pub fn cache_control(&self) -> &'static str {
        self.kind.cache_control()
    }

    /// Path relative to the output directory.
    pub fn relative_path(&self) -> PathBuf {
        self.route.trim_start_matches('/').split('/').collect()
    }
}

/// Render a static-host `_headers` file.
///
/// One block per route pattern, each listing the content type and cache
/// policy of the artifacts it matches.
pub fn headers_file(rules: &[(String, ArtifactKind)]) -> String {
    let mut out = String::new();
    for (i, (pattern, kind)) in rules.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{pattern}");
        let _ = writeln!(out, "  Content-Type: {}", kind.content_type());
        let _ = writeln!(out, "  Cache-Control: {}", kind.cache_control());
    }
    out
}
