//! Serve a directory with import maps inlined.

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};

use crate::{middleware::import_map_middleware, Config};

/// List of server errors.
#[derive(Debug, Error)]
pub enum ServeError {
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Create a router that delivers files from `config.served_dir`.
///
/// HTML responses go through the [`import_map_middleware`] middleware. A
/// `404.html` file in the served directory is used as not found page.
pub fn router(config: Config) -> Router {
    let dir = config.served_dir.clone();

    let not_found_path = dir.join("404.html");

    let serve_dir = ServeDir::new(&dir);

    let router = if not_found_path.exists() {
        Router::new().fallback_service(serve_dir.not_found_service(ServeFile::new(not_found_path)))
    } else {
        Router::new().fallback_service(serve_dir)
    };

    router.layer(axum::middleware::from_fn_with_state(
        Arc::new(config),
        import_map_middleware,
    ))
}

/// Serve the files of `config.served_dir`.
///
/// This function creates a HTTP server listening on `127.0.0.1:port`.
pub async fn serve(config: Config, port: u16) -> Result<(), ServeError> {
    let router = router(config);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok(axum::serve(listener, router.into_make_service()).await?)
}
