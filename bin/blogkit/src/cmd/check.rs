//! Check command - validate configuration and posts

use std::path::Path;

use blogkit_core::Config;
use blogkit_generator::{EntryKind, PostCollector, SitemapGenerator, TagIndex};
use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};

/// Summary of a blog as the generators see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub posts: usize,
    pub drafts: usize,
    pub tags: usize,
    pub sitemap_urls: usize,
    pub images: usize,
}

/// Inspect the blog described by `config` without writing or fetching anything.
pub fn inspect(config: &Config) -> Result<CheckReport> {
    let posts = PostCollector::new(&config.content.posts_dir)
        .collect()
        .wrap_err("Failed to collect posts")?;

    let drafts = posts.iter().filter(|p| p.draft).count();
    let tags = TagIndex::build(&posts).len();
    let entries = SitemapGenerator::new(config.site_url()).entries_at(&posts, Utc::now());
    let images = entries.iter().filter(|e| e.kind == EntryKind::Post).count();

    Ok(CheckReport {
        posts: posts.len(),
        drafts,
        tags,
        sitemap_urls: entries.len(),
        images,
    })
}

/// Run the check command.
pub fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking configuration and posts");

    println!("Checking configuration...");
    let config = Config::load_with_env(config_path).wrap_err("Configuration invalid")?;
    println!("  ✓ Configuration valid");
    println!("  Site:   {}", config.site_url());
    println!("  Author: {}", config.site.author);

    println!("\nChecking posts...");
    let report = inspect(&config)?;
    println!("  ✓ {} post(s) valid", report.posts);

    println!();
    println!("Summary:");
    println!("  Posts:        {}", report.posts);
    println!("  Drafts:       {}", report.drafts);
    println!("  Tags:         {}", report.tags);
    println!("  Sitemap URLs: {}", report.sitemap_urls);
    println!("  Images:       {}", report.images);
    println!();
    println!("✓ All checks passed");

    Ok(())
}
