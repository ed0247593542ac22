// Store proxy module.
// HTTP front for the gist-backed document, with CORS for browser clients.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware,
    response::Response,
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::github::GitHubClient;

pub mod error;
pub mod routes;
pub mod source;

pub use error::ProxyError;
pub use routes::ProxyState;
pub use source::{DocumentSource, GistSource};

use routes::{method_not_allowed, read_handler, write_handler};

/// Routes for `/api` and `/api/`. Every OPTIONS request is answered by the
/// CORS layer as a preflight, with 204 No Content.
pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = get(read_handler)
        .post(write_handler)
        .fallback(method_not_allowed);

    Router::new()
        .route("/api", api.clone())
        .route("/api/", api)
        .layer(cors)
        .layer(middleware::map_response(preflight_no_content))
        .with_state(state)
}

/// The CORS layer answers preflights with an empty 200; browsers and the
/// store clients expect 204.
async fn preflight_no_content(method: Method, mut response: Response) -> Response {
    if method == Method::OPTIONS && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Run the proxy until Ctrl+C or SIGTERM.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    let client = GitHubClient::new(&config.github_token)?;
    let source = GistSource::new(client, &config.gist_id, &config.gist_filename);
    let app = router(ProxyState::new(source));

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!(gist_id = %config.gist_id, filename = %config.gist_filename, "Store proxy running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Store proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
