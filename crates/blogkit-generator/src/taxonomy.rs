//! Tag index over published posts.

use std::collections::BTreeMap;

use blogkit_core::{PostRecord, post::published};
use chrono::{DateTime, Utc};

/// Tag name to the published posts carrying it, ordered by tag name.
///
/// Drafts are dropped before indexing, so a tag used only by drafts does
/// not appear.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    tags: BTreeMap<&'a str, Vec<&'a PostRecord>>,
}

impl<'a> TagIndex<'a> {
    /// Index the tags of every non-draft post in `posts`.
    pub fn build(posts: &'a [PostRecord]) -> Self {
        let mut tags: BTreeMap<&'a str, Vec<&'a PostRecord>> = BTreeMap::new();

        for post in published(posts) {
            for tag in &post.tags {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                let members = tags.entry(tag).or_default();
                // a post listing the same tag twice is a member once
                if !members.iter().any(|p| std::ptr::eq(*p, post)) {
                    members.push(post);
                }
            }
        }

        Self { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tag names in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tags.keys().copied()
    }

    /// Posts carrying `tag`, in collection order.
    pub fn posts(&self, tag: &str) -> &[&'a PostRecord] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Most recent `last_modified()` among the posts carrying `tag`.
    pub fn last_modified(&self, tag: &str) -> Option<DateTime<Utc>> {
        self.posts(tag).iter().map(|p| p.last_modified()).max()
    }
}
