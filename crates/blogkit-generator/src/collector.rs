//! Post collection.
//!
//! Walks the posts directory and reads the frontmatter of every Markdown
//! file into a [`PostRecord`]. Any invalid post fails the whole collection.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use blogkit_core::{CoreError, PostRecord, frontmatter::parse_frontmatter};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// File extensions treated as posts.
const POST_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The posts directory does not exist.
    #[error("posts directory not found: {0}")]
    MissingDir(PathBuf),

    /// A post has invalid or missing frontmatter.
    #[error(transparent)]
    Post(#[from] CoreError),

    /// Two posts resolve to the same slug.
    #[error("duplicate slug `{slug}` in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Reads every post under a directory.
#[derive(Debug, Clone)]
pub struct PostCollector {
    posts_dir: PathBuf,
}

impl PostCollector {
    /// Create a new post collector.
    #[must_use]
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Collect all posts, newest first.
    ///
    /// Posts with equal publication dates are ordered by slug.
    pub fn collect(&self) -> Result<Vec<PostRecord>> {
        info!(dir = %self.posts_dir.display(), "collecting posts");

        if !self.posts_dir.is_dir() {
            return Err(CollectorError::MissingDir(self.posts_dir.clone()));
        }

        let mut files = Vec::new();
        walk_dir(&self.posts_dir, &mut files)?;
        files.sort();
        debug!(count = files.len(), "found post files");

        let parsed: Vec<(PathBuf, PostRecord)> = files
            .into_par_iter()
            .map(|path| {
                let post = parse_file(&path)?;
                Ok((path, post))
            })
            .collect::<Result<_>>()?;

        let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(parsed.len());
        for (path, post) in &parsed {
            if let Some(first) = seen.insert(&post.slug, path) {
                return Err(CollectorError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: first.to_path_buf(),
                    second: path.clone(),
                });
            }
        }

        let mut posts: Vec<PostRecord> = parsed.into_iter().map(|(_, post)| post).collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| a.slug.cmp(&b.slug)));

        info!(
            posts = posts.len(),
            drafts = posts.iter().filter(|p| p.draft).count(),
            "post collection complete"
        );

        Ok(posts)
    }
}

/// Recursively walk a directory for post files, skipping hidden entries.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_error = |source| CollectorError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();

        if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.is_file() && is_post_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| POST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Slug derived from the file location: the file stem, or the parent
/// directory name for `index.*` files.
fn path_slug(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if stem == "index"
        && let Some(parent) = path.parent().and_then(Path::file_name)
    {
        return parent.to_string_lossy().into_owned();
    }

    stem
}

fn parse_file(path: &Path) -> Result<PostRecord> {
    debug!(path = %path.display(), "parsing post");

    let content = fs::read_to_string(path).map_err(|source| CollectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let frontmatter = parse_frontmatter(&content, path)?;
    Ok(PostRecord::from_frontmatter(frontmatter, &path_slug(path), path)?)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collects_sorted_posts() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "first.md",
            "---\ntitle: First\npubDate: 2024-01-01\ntags: [rust]\n---\nBody",
        );
        write(
            dir.path(),
            "nested/second.mdx",
            "---\ntitle: Second\ndate: 2024-02-01T10:00:00Z\n---\n",
        );
        write(
            dir.path(),
            "third/index.markdown",
            "+++\ntitle = \"Third\"\npub_date = 2024-02-01T10:00:00Z\ndraft = true\n+++\n",
        );
        write(dir.path(), "notes.txt", "not a post");

        let posts = PostCollector::new(dir.path()).collect().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();

        assert_eq!(slugs, vec!["second", "third", "first"]);
        assert!(posts[1].draft);
        assert_eq!(posts[2].tags, vec!["rust"]);
    }

    #[test]
    fn test_frontmatter_slug_wins() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "2024-01-01-hello.md",
            "---\ntitle: Hello\nslug: hello-world\npubDate: 2024-01-01\n---\n",
        );

        let posts = PostCollector::new(dir.path()).collect().unwrap();
        assert_eq!(posts[0].slug, "hello-world");
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".drafts/secret.md", "not even frontmatter");
        write(dir.path(), "ok.md", "---\ntitle: Ok\npubDate: 2024-01-01\n---\n");

        let posts = PostCollector::new(dir.path()).collect().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_missing_pub_date_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.md", "---\ntitle: No date\n---\n");

        let err = PostCollector::new(dir.path()).collect().unwrap_err();
        assert!(matches!(err, CollectorError::Post(_)));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_missing_frontmatter_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "plain.md", "# Just markdown\n");

        let err = PostCollector::new(dir.path()).collect().unwrap_err();
        assert!(err.to_string().contains("plain.md"));
    }

    #[test]
    fn test_duplicate_slug_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/post.md", "---\ntitle: A\npubDate: 2024-01-01\n---\n");
        write(dir.path(), "b/post.md", "---\ntitle: B\npubDate: 2024-01-02\n---\n");

        let err = PostCollector::new(dir.path()).collect().unwrap_err();
        assert!(matches!(err, CollectorError::DuplicateSlug { ref slug, .. } if slug == "post"));
    }

    #[test]
    fn test_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = PostCollector::new(dir.path().join("nope"))
            .collect()
            .unwrap_err();
        assert!(matches!(err, CollectorError::MissingDir(_)));
    }

    #[test]
    fn test_path_slug() {
        assert_eq!(path_slug(Path::new("posts/hello.md")), "hello");
        assert_eq!(path_slug(Path::new("posts/hello/index.md")), "hello");
        assert!(is_post_file(Path::new("a.MD")));
        assert!(!is_post_file(Path::new("a.html")));
    }
}
