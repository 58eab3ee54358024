//! Preview server rendering artifacts per request
//!
//! Every request re-reads the posts directory, so edits show up without a
//! restart. Fonts are resolved once and shared.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use blogkit_core::Config;
use blogkit_generator::{
    Artifact, CollectorError, PostCollector, ROBOTS_ROUTE, Route, SiteArtifacts,
};
use blogkit_og::{CardTemplate, FontProvider, OgError, OgImageRenderer};
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Errors raised while serving a request.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Posts could not be collected.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// A preview image could not be rendered.
    #[error("preview image error: {0}")]
    Og(#[from] OgError),

    /// The rendering task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Shared server state.
#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    posts_dir: PathBuf,
    fonts: Arc<dyn FontProvider>,
}

impl ServerState {
    pub fn new(config: Config, fonts: Arc<dyn FontProvider>) -> Self {
        let posts_dir = PathBuf::from(&config.content.posts_dir);
        Self {
            config: Arc::new(config),
            posts_dir,
            fonts,
        }
    }

    /// Render the artifact at `path`, if there is one.
    ///
    /// Blocking: collects posts from disk and may fetch fonts. robots.txt
    /// does not depend on posts and is served without reading them.
    pub fn render(&self, path: &str) -> Result<Option<Artifact>, ServeError> {
        if path == ROBOTS_ROUTE {
            return Ok(Some(
                SiteArtifacts::from_config(&self.config, Vec::new()).robots(),
            ));
        }

        let posts = PostCollector::new(&self.posts_dir).collect()?;
        let site = SiteArtifacts::from_config(&self.config, posts);

        let artifact = match site.resolve(path) {
            None => return Ok(None),
            Some(Route::Sitemap) => site.sitemap(),
            Some(Route::Robots) => site.robots(),
            Some(Route::OgImage(post)) => {
                let template = CardTemplate::from_config(&self.config);
                let renderer = OgImageRenderer::from_provider(template, self.fonts.as_ref())?;
                site.og_image(&renderer, post)?
            }
        };
        Ok(Some(artifact))
    }
}

/// Create the preview server router.
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .fallback(serve_artifact)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Convert an artifact into a response carrying its content type and cache policy.
pub fn artifact_response(artifact: Artifact) -> Response {
    (
        [
            (header::CONTENT_TYPE, artifact.content_type()),
            (header::CACHE_CONTROL, artifact.cache_control()),
        ],
        artifact.body,
    )
        .into_response()
}

async fn serve_artifact(
    State(state): State<ServerState>,
    uri: Uri,
) -> Result<Response, ServeError> {
    let path = uri.path().to_string();
    let artifact = tokio::task::spawn_blocking(move || state.render(&path)).await??;

    Ok(match artifact {
        Some(artifact) => artifact_response(artifact),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    })
}
