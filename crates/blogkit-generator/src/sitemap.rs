//! Sitemap generation.
//!
//! Generates the XML sitemap listing every public URL of the blog: the
//! static pages, one entry per published post and one per tag.

use std::io::{self, Write};

use blogkit_core::{PostRecord, SiteUrl, post::published};
use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use crate::taxonomy::TagIndex;

/// Characters escaped in a tag's URL path segment: everything except
/// unreserved characters.
const TAG_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Change frequency hint for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// The kind of page a sitemap entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Home,
    PostsListing,
    TagsListing,
    About,
    Post,
    Tag,
}

impl EntryKind {
    /// Static pages, in sitemap order.
    pub const STATIC: [Self; 4] = [Self::Home, Self::PostsListing, Self::TagsListing, Self::About];

    pub fn changefreq(&self) -> ChangeFreq {
        match self {
            Self::About | Self::Post => ChangeFreq::Monthly,
            Self::Home | Self::PostsListing | Self::TagsListing | Self::Tag => ChangeFreq::Weekly,
        }
    }

    pub fn priority(&self) -> f32 {
        match self {
            Self::Home => 1.0,
            Self::Post => 0.9,
            Self::PostsListing => 0.8,
            Self::TagsListing => 0.7,
            Self::About => 0.6,
            Self::Tag => 0.5,
        }
    }

    /// Path of a static page.
    fn static_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::PostsListing => "/posts/",
            Self::TagsListing => "/tags/",
            Self::About => "/about/",
            Self::Post | Self::Tag => "",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Absolute URL, always ending in `/`.
    pub loc: String,

    /// Last modification date.
    pub lastmod: DateTime<Utc>,

    pub kind: EntryKind,
}

impl SitemapUrl {
    fn new(kind: EntryKind, loc: String, lastmod: DateTime<Utc>) -> Self {
        Self { loc, lastmod, kind }
    }

    pub fn changefreq(&self) -> ChangeFreq {
        self.kind.changefreq()
    }

    pub fn priority(&self) -> f32 {
        self.kind.priority()
    }
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    site: SiteUrl,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(site: SiteUrl) -> Self {
        Self { site }
    }

    /// Sitemap entries for `posts`, in output order.
    ///
    /// Static pages take the most recent post date; `now` is used only when
    /// there are no published posts.
    pub fn entries_at(&self, posts: &[PostRecord], now: DateTime<Utc>) -> Vec<SitemapUrl> {
        let public: Vec<&PostRecord> = published(posts).collect();
        let tags = TagIndex::build(posts);

        let site_lastmod = public
            .iter()
            .map(|p| p.last_modified())
            .max()
            .unwrap_or(now);

        let mut entries = Vec::with_capacity(EntryKind::STATIC.len() + public.len() + tags.len());

        for kind in EntryKind::STATIC {
            entries.push(SitemapUrl::new(
                kind,
                self.site.page(kind.static_path()),
                site_lastmod,
            ));
        }

        for post in &public {
            entries.push(SitemapUrl::new(
                EntryKind::Post,
                self.site.page(&format!("posts/{}", post.slug)),
                post.last_modified(),
            ));
        }

        for tag in tags.tags() {
            let lastmod = tags.last_modified(tag).unwrap_or(site_lastmod);
            entries.push(SitemapUrl::new(
                EntryKind::Tag,
                self.site.page(&format!("tags/{}", tag_segment(tag))),
                lastmod,
            ));
        }

        debug!(
            posts = public.len(),
            tags = tags.len(),
            entries = entries.len(),
            "collected sitemap entries"
        );

        entries
    }

    /// Generate sitemap XML for `posts`.
    pub fn generate(&self, posts: &[PostRecord]) -> String {
        self.generate_at(posts, Utc::now())
    }

    /// Generate sitemap XML, using `now` as the date of an empty blog.
    pub fn generate_at(&self, posts: &[PostRecord], now: DateTime<Utc>) -> String {
        to_xml(&self.entries_at(posts, now))
    }

    /// Write sitemap XML for `posts` to a writer.
    pub fn write_to<W: Write>(&self, posts: &[PostRecord], writer: &mut W) -> io::Result<()> {
        writer.write_all(self.generate(posts).as_bytes())
    }
}

/// Serialize sitemap entries as a `urlset` document.
pub fn to_xml(entries: &[SitemapUrl]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str(&url_to_xml(entry));
    }

    xml.push_str("</urlset>\n");
    xml
}

/// A tag as a URL path segment. `machine learning` becomes `machine%20learning`.
pub fn tag_segment(tag: &str) -> String {
    utf8_percent_encode(tag, TAG_SEGMENT).to_string()
}

fn url_to_xml(url: &SitemapUrl) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
        escape_xml(&url.loc),
        format_lastmod(url.lastmod),
        url.changefreq().as_str(),
        url.priority()
    )
}

/// UTC timestamp with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_lastmod(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn generator() -> SitemapGenerator {
        SitemapGenerator::new(SiteUrl::new(Some("https://blog.example.com/")))
    }

    fn date(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn post(slug: &str, tags: &[&str], pub_date: DateTime<Utc>) -> PostRecord {
        PostRecord {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            pub_date,
            updated_date: None,
            draft: false,
        }
    }

    #[test]
    fn test_empty_collection_has_static_pages() {
        let now = date(6, 1);
        let entries = generator().entries_at(&[], now);

        let locs: Vec<_> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://blog.example.com/",
                "https://blog.example.com/posts/",
                "https://blog.example.com/tags/",
                "https://blog.example.com/about/",
            ]
        );
        assert!(entries.iter().all(|e| e.lastmod == now));
    }

    #[test]
    fn test_static_pages_use_most_recent_post() {
        let mut old = post("old", &[], date(1, 1));
        old.updated_date = Some(date(4, 1));
        let posts = vec![post("new", &[], date(3, 1)), old];

        let entries = generator().entries_at(&posts, date(12, 31));

        assert_eq!(entries[0].lastmod, date(4, 1));
        assert_eq!(entries[4].loc, "https://blog.example.com/posts/new/");
        assert_eq!(entries[4].lastmod, date(3, 1));
        assert_eq!(entries[5].lastmod, date(4, 1));
    }

    #[test]
    fn test_entry_hints() {
        let posts = vec![post("a", &["rust"], date(1, 1))];
        let entries = generator().entries_at(&posts, date(1, 1));

        let hints: Vec<_> = entries
            .iter()
            .map(|e| (e.kind, e.changefreq(), e.priority()))
            .collect();
        assert_eq!(
            hints,
            vec![
                (EntryKind::Home, ChangeFreq::Weekly, 1.0),
                (EntryKind::PostsListing, ChangeFreq::Weekly, 0.8),
                (EntryKind::TagsListing, ChangeFreq::Weekly, 0.7),
                (EntryKind::About, ChangeFreq::Monthly, 0.6),
                (EntryKind::Post, ChangeFreq::Monthly, 0.9),
                (EntryKind::Tag, ChangeFreq::Weekly, 0.5),
            ]
        );
    }

    #[test]
    fn test_tags_listed_once_in_name_order() {
        let posts = vec![
            post("a", &["web", "rust"], date(2, 1)),
            post("b", &["rust"], date(1, 1)),
        ];
        let entries = generator().entries_at(&posts, date(1, 1));

        let tag_locs: Vec<_> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Tag)
            .map(|e| e.loc.as_str())
            .collect();
        assert_eq!(
            tag_locs,
            vec![
                "https://blog.example.com/tags/rust/",
                "https://blog.example.com/tags/web/",
            ]
        );
    }

    #[test]
    fn test_generate_xml() {
        let posts = vec![post("hello", &[], date(1, 2))];
        let xml = generator().generate_at(&posts, date(1, 1));

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains(
            "  <url>\n    <loc>https://blog.example.com/posts/hello/</loc>\n    <lastmod>2024-01-02T00:00:00.000Z</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.9</priority>\n  </url>\n"
        ));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert_eq!(xml.matches("<url>").count(), 5);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_generate_escapes_text() {
        let generator = SitemapGenerator::new(SiteUrl::new(Some("https://example.com/?a=1&b=2")));
        let xml = generator.generate_at(&[], date(1, 1));

        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=2/</loc>"));
        assert!(!xml.contains("a=1&b"));
    }

    #[test]
    fn test_tag_urls_are_percent_encoded() {
        let posts = vec![post("a", &["machine learning", "c&c", "c++", "rust-lang", "日本"], date(1, 1))];
        let locs: Vec<_> = generator()
            .entries_at(&posts, date(1, 1))
            .into_iter()
            .filter(|e| e.kind == EntryKind::Tag)
            .map(|e| e.loc)
            .collect();

        assert_eq!(
            locs,
            vec![
                "https://blog.example.com/tags/c%26c/",
                "https://blog.example.com/tags/c%2B%2B/",
                "https://blog.example.com/tags/machine%20learning/",
                "https://blog.example.com/tags/rust-lang/",
                "https://blog.example.com/tags/%E6%97%A5%E6%9C%AC/",
            ]
        );
    }

    #[test]
    fn test_write_to() {
        let mut out = Vec::new();
        generator().write_to(&[], &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert_eq!(xml.matches("<url>").count(), 4);
    }

    #[test]
    fn test_format_lastmod() {
        let date = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(format_lastmod(date), "2024-05-06T07:08:09.000Z");
    }
}
