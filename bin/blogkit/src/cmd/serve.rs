//! Serve command - preview server for the generated artifacts

use std::{path::Path, sync::Arc};

use blogkit_core::Config;
use blogkit_og::{CachedFontProvider, HttpFontProvider};
use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;

use crate::server::{ServerState, create_router};

/// Run the serve command.
///
/// Serves `/sitemap.xml`, `/robots.txt` and the preview images with the same
/// headers a static host would send, rendering each on request.
pub async fn run(config_path: &Path, host: &str, port: u16) -> Result<()> {
    tracing::info!(?config_path, host, port, "Starting preview server");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let og_dir = config.build.og_dir.trim_matches('/').to_string();

    let fonts = Arc::new(CachedFontProvider::new(HttpFontProvider::from_config(
        &config.og,
    )));
    let app = create_router(ServerState::new(config, fonts));

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Preview server running at http://{addr}");
    println!("    http://{addr}/sitemap.xml");
    println!("    http://{addr}/robots.txt");
    println!("    http://{addr}/{og_dir}/<slug>.png");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
