//! HTTP server for the pre-rendered site
//!
//! Pages written by the generator are served from the public directory.
//! Posts that were not pre-rendered get the fallback shell first; the shell
//! requests `/data/post/{uid}`, which renders and persists the page.
//!
//! Every request that reads content opens its own content API handle, so it
//! sees the repository's current master ref rather than the one of the build.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::PrismicConfig;
use crate::generator::Generator;
use crate::pages::home;
use crate::prismic::{get_prismic_client, ContentApi, PrismicError};
use crate::Blog;

/// Opens a content API handle for one request
type Connect = dyn Fn() -> Result<Arc<dyn ContentApi>> + Send + Sync;

/// Server state
pub struct AppState {
    generator: Generator,
    connect: Box<Connect>,
}

impl AppState {
    pub fn new<F>(generator: Generator, connect: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ContentApi>> + Send + Sync + 'static,
    {
        Self {
            generator,
            connect: Box::new(connect),
        }
    }

    /// State that opens a fresh Prismic client for each request
    pub fn for_prismic(generator: Generator, config: PrismicConfig) -> Self {
        Self::new(generator, move || {
            let client = get_prismic_client(&config)?;
            Ok(Arc::new(client) as Arc<dyn ContentApi>)
        })
    }

    fn api(&self) -> Result<Arc<dyn ContentApi>> {
        (self.connect)()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.generator.public_dir().to_path_buf();

    Router::new()
        .route("/", get(index_handler))
        .route("/post/:uid", get(post_handler))
        .route("/data/post/:uid", get(post_data_handler))
        .route("/api/posts", get(more_posts_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pre-render the site, then serve it
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let client = blog.client()?;
    let generator = Generator::new(blog)?;

    tracing::info!("Pre-rendering pages...");
    let report = generator.generate(&client).await?;
    tracing::info!(
        "Pre-rendered the listing and {} posts",
        report.prerendered.len()
    );

    let state = Arc::new(AppState::for_prismic(generator, blog.config.prismic.clone()));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Errors surfaced to the browser
pub struct ServerError {
    status: StatusCode,
    error: anyhow::Error,
}

impl<E: Into<anyhow::Error>> From<E> for ServerError {
    fn from(error: E) -> Self {
        let error = error.into();
        let status = match error.downcast_ref::<PrismicError>() {
            Some(PrismicError::InvalidCursor(_)) | Some(PrismicError::ForeignCursor(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(PrismicError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, error }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.error);
        } else {
            tracing::debug!("Request rejected: {:#}", self.error);
        }
        (self.status, self.status.canonical_reason().unwrap_or("Error")).into_response()
    }
}

/// Listing page, rendered on demand if the build did not produce it
async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    let path = state.generator.public_dir().join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html)),
        Err(_) => {
            let api = state.api()?;
            let (html, _) = state.generator.generate_index(api.as_ref()).await?;
            Ok(Html(html))
        }
    }
}

/// Post page: the rendered file when present, the fallback shell otherwise
async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Html<String>, ServerError> {
    if let Some(path) = state.generator.post_output_path(&uid) {
        if let Ok(html) = tokio::fs::read_to_string(&path).await {
            return Ok(Html(html));
        }
    }

    tracing::debug!("Serving fallback for {}", uid);
    Ok(Html(state.generator.render_fallback(&uid)?))
}

/// Render a post on demand
async fn post_data_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Response, ServerError> {
    let api = state.api()?;
    match state.generator.generate_post(api.as_ref(), &uid).await? {
        Some(html) => Ok(Html(html).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "Not found").into_response()),
    }
}

#[derive(Debug, Deserialize)]
struct MorePostsQuery {
    cursor: String,
}

/// Next page of the listing for the "load more" control
async fn more_posts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MorePostsQuery>,
) -> Result<Json<home::MorePosts>, ServerError> {
    let api = state.api()?;
    let more = home::more_posts(state.generator.site(), api.as_ref(), &query.cursor).await?;
    Ok(Json(more))
}
