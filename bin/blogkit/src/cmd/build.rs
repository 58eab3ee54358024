//! Build command - writes every artifact to the output directory

use std::{path::Path, time::Instant};

use blogkit_core::Config;
use blogkit_generator::Builder;
use blogkit_og::{CachedFontProvider, HttpFontProvider};
use color_eyre::eyre::{Result, WrapErr};

/// Run the build command.
///
/// `output` overrides the configured output directory.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, "Starting build");

    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if let Some(output) = output {
        config.build.output_dir = output.to_string_lossy().to_string();
    }

    tracing::debug!(?config, "Loaded configuration");

    let fonts = CachedFontProvider::new(HttpFontProvider::from_config(&config.og));
    let builder = Builder::from_config(config);
    let stats = builder.build(&fonts).wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:        {}", stats.posts);
    println!("  Drafts:       {}", stats.drafts);
    println!("  Sitemap URLs: {}", stats.sitemap_urls);
    println!("  Images:       {}", stats.images);
    println!();
    println!("  Duration:     {:.2}s", duration.as_secs_f64());
    println!("  Output:       {}", builder.output_dir().display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
