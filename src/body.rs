//! Normalize response bodies into HTML text.

use std::path::Path;

use axum::body::{Body, Bytes};

use crate::{transform::inline_import_maps, Error};

/// A response body, as produced by a handler.
#[derive(Debug)]
pub enum HtmlBody {
    /// In-memory text.
    Text(String),
    /// In-memory binary buffer, assumed to hold UTF-8 encoded HTML.
    Binary(Bytes),
    /// Streamed body.
    Stream(Body),
}

impl HtmlBody {
    /// Convert the body into HTML text.
    ///
    /// A streamed body is drained completely first. It fails with
    /// [`Error::ReadBody`] if it yields an error or more than `limit` bytes.
    pub async fn into_html(self, limit: usize) -> Result<String, Error> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Binary(bytes) => decode(bytes),
            Self::Stream(body) => {
                let bytes = axum::body::to_bytes(body, limit)
                    .await
                    .map_err(Error::ReadBody)?;
                decode(bytes)
            },
        }
    }
}

fn decode(bytes: Bytes) -> Result<String, Error> {
    String::from_utf8(bytes.into()).map_err(Error::UnsupportedBody)
}

impl From<String> for HtmlBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HtmlBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Bytes> for HtmlBody {
    fn from(bytes: Bytes) -> Self {
        Self::Binary(bytes)
    }
}

impl From<Vec<u8>> for HtmlBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes.into())
    }
}

impl From<Body> for HtmlBody {
    fn from(body: Body) -> Self {
        Self::Stream(body)
    }
}

/// Inline the import maps of an HTML body.
///
/// The body is normalized into text whatever its representation, then
/// transformed with [`inline_import_maps`].
pub async fn inline_body(
    served_dir: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
    body: impl Into<HtmlBody>,
    limit: usize,
) -> Result<String, Error> {
    let html = body.into().into_html(limit).await?;
    inline_import_maps(served_dir, document_path, &html).await
}
