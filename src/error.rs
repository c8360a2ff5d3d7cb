//! Errors raised while inlining import maps.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lol_html::errors::RewritingError;
use thiserror::Error;

/// List of errors raised while inlining import maps.
#[derive(Debug, Error)]
pub enum Error {
    /// The response body cannot be read as HTML text.
    #[error("unsupported response body: not UTF-8 encoded HTML")]
    UnsupportedBody(#[source] std::string::FromUtf8Error),
    /// The streamed response body could not be drained.
    #[error("while reading the response body")]
    ReadBody(#[source] axum::Error),
    /// The import map file could not be read.
    #[error("while reading import map {path:?}")]
    LoadImportMap {
        /// Resolved path of the import map.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
    /// The import map file is not valid JSON.
    #[error("while parsing import map {path:?}")]
    ParseImportMap {
        /// Resolved path of the import map.
        path: PathBuf,
        /// Source error.
        source: serde_json::Error,
    },
    /// LolHtml error.
    #[error(transparent)]
    Rewriting(#[from] RewritingError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match std::error::Error::source(&self) {
            Some(source) => tracing::error!("{}: {}", self, source),
            None => tracing::error!("{}", self),
        }

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
