//! Post records as supplied by the post collection.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    frontmatter::Frontmatter,
};

/// A published (or draft) blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unique URL-safe identifier.
    pub slug: String,

    /// Display title.
    pub title: String,

    /// Optional description, passed through untouched.
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered tags, possibly empty.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Publication date.
    pub pub_date: DateTime<Utc>,

    /// Last updated date, superseding `pub_date` for recency when present.
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,

    /// Drafts never appear in public manifests.
    #[serde(default)]
    pub draft: bool,
}

impl PostRecord {
    /// Build a post from parsed frontmatter.
    ///
    /// `fallback_slug` is used when the frontmatter does not set `slug`.
    pub fn from_frontmatter(fm: Frontmatter, fallback_slug: &str, path: &Path) -> Result<Self> {
        let title = fm.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::invalid_post(path, "title is required"));
        }

        let Some(pub_date) = fm.pub_date else {
            return Err(CoreError::invalid_post(path, "pubDate is required"));
        };

        let slug = fm
            .slug
            .as_deref()
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_slug)
            .to_string();
        if slug.is_empty() {
            return Err(CoreError::invalid_post(path, "slug cannot be empty"));
        }
        if slug == "." || slug == ".." || slug.contains(['/', '\\']) {
            return Err(CoreError::invalid_post(
                path,
                format!("slug `{slug}` must be a single path segment"),
            ));
        }

        Ok(Self {
            slug,
            title,
            description: fm.description,
            tags: fm.tags,
            pub_date,
            updated_date: fm.updated_date,
            draft: fm.draft,
        })
    }

    /// Recency of this post: `updated_date` if present, else `pub_date`.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_date.unwrap_or(self.pub_date)
    }

    /// Whether this post may appear in public manifests.
    pub fn is_public(&self) -> bool {
        !self.draft
    }
}

/// Iterate over the non-draft posts of a collection, preserving order.
pub fn published(posts: &[PostRecord]) -> impl Iterator<Item = &PostRecord> {
    posts.iter().filter(|p| p.is_public())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn frontmatter() -> Frontmatter {
        Frontmatter {
            title: "Hello".to_string(),
            pub_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_frontmatter_uses_fallback_slug() {
        let post =
            PostRecord::from_frontmatter(frontmatter(), "hello-world", Path::new("a.md")).unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello");
        assert!(!post.draft);
    }

    #[test]
    fn test_from_frontmatter_explicit_slug() {
        let mut fm = frontmatter();
        fm.slug = Some("/custom/".to_string());
        let post = PostRecord::from_frontmatter(fm, "ignored", Path::new("a.md")).unwrap();
        assert_eq!(post.slug, "custom");
    }

    #[test]
    fn test_from_frontmatter_rejects_path_slugs() {
        for slug in ["../../x", "a/b", "..", ".", "a\\b"] {
            let mut fm = frontmatter();
            fm.slug = Some(slug.to_string());
            let err = PostRecord::from_frontmatter(fm, "ignored", Path::new("a.md")).unwrap_err();
            assert!(err.to_string().contains("single path segment"), "{slug}");
        }

        let err = PostRecord::from_frontmatter(frontmatter(), "..", Path::new("a.md")).unwrap_err();
        assert!(err.to_string().contains("single path segment"));
    }

    #[test]
    fn test_from_frontmatter_requires_pub_date() {
        let mut fm = frontmatter();
        fm.pub_date = None;
        let err = PostRecord::from_frontmatter(fm, "a", Path::new("a.md")).unwrap_err();
        assert!(err.to_string().contains("pubDate is required"));
    }

    #[test]
    fn test_from_frontmatter_requires_title() {
        let mut fm = frontmatter();
        fm.title = "   ".to_string();
        let err = PostRecord::from_frontmatter(fm, "a", Path::new("a.md")).unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_last_modified_prefers_updated_date() {
        let mut post = PostRecord::from_frontmatter(frontmatter(), "a", Path::new("a.md")).unwrap();
        assert_eq!(post.last_modified(), post.pub_date);

        let updated = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        post.updated_date = Some(updated);
        assert_eq!(post.last_modified(), updated);
    }

    #[test]
    fn test_published_skips_drafts() {
        let a = PostRecord::from_frontmatter(frontmatter(), "a", Path::new("a.md")).unwrap();
        let mut b = a.clone();
        b.slug = "b".to_string();
        b.draft = true;

        let posts = vec![a, b];
        let slugs: Vec<_> = published(&posts).map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a"]);
    }
}
