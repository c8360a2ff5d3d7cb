//! Inline import maps in HTML responses.

use std::{path::Path, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{
            ACCEPT_RANGES, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ETAG,
            IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, LAST_MODIFIED, RANGE,
        },
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri,
    },
    middleware::Next,
    response::Response,
};

use crate::{body::inline_body, Config, Error};

/// Content type of transformed responses.
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Request headers that let the inner service answer with a partial or empty
/// body.
const PARTIAL_REQUEST_HEADERS: [HeaderName; 4] =
    [IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, RANGE];

/// Response headers that describe the file rather than the transformed body.
const FILE_RESPONSE_HEADERS: [HeaderName; 4] =
    [ACCEPT_RANGES, CONTENT_LENGTH, ETAG, LAST_MODIFIED];

/// The request being served, and the response produced for it.
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// Request method.
    pub method: &'a Method,
    /// Request URI.
    pub uri: &'a Uri,
    /// Request headers.
    pub request_headers: &'a HeaderMap,
    /// Response produced by the inner service.
    pub response: &'a Response,
}

/// Check if the headers declare an HTML content.
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
}

/// Check if the headers declare a content encoding (e.g. `gzip`).
fn is_encoded(headers: &HeaderMap) -> bool {
    headers
        .get_all(CONTENT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|encoding| !encoding.trim().eq_ignore_ascii_case("identity"))
}

/// Check if a file path designates an HTML document.
fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm")
        })
}

/// Check if a response status comes with a complete body.
fn has_complete_body(status: StatusCode) -> bool {
    !status.is_informational()
        && ![
            StatusCode::NO_CONTENT,
            StatusCode::PARTIAL_CONTENT,
            StatusCode::NOT_MODIFIED,
        ]
        .contains(&status)
}

/// Middleware that inlines the external import maps of HTML responses.
///
/// The request is passed to `next`, then once the response is produced, its
/// body is transformed if it is HTML and `config.should_run` agrees.
/// Responses to `HEAD` requests and encoded, partial or empty responses are
/// passed through.
///
/// A transformed body depends on the import map files as well as on the HTML
/// file. So for HTML documents, range and conditional request headers are
/// removed before calling `next`, and the file validators (`ETag`,
/// `Last-Modified`) and `Accept-Ranges` are removed from the response.
///
/// ```ignore
/// let config = Arc::new(Config::new("public", index_file_path));
/// let router = Router::new()
///     .fallback_service(ServeDir::new("public"))
///     .layer(axum::middleware::from_fn_with_state(config, import_map_middleware));
/// ```
pub async fn import_map_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_headers = request.headers().clone();

    let document_path = config.document_path(uri.path());

    if method != Method::HEAD && is_html_path(&document_path) {
        for name in PARTIAL_REQUEST_HEADERS {
            request.headers_mut().remove(name);
        }
    }

    let response = next.run(request).await;

    if method == Method::HEAD
        || !has_complete_body(response.status())
        || !is_html(response.headers())
    {
        return Ok(response);
    }

    if is_encoded(response.headers()) {
        tracing::debug!("Skipping encoded HTML response for {}", uri);
        return Ok(response);
    }

    // Response bodies are not `Sync`, keep the context out of await points
    let should_run = {
        let context = RequestContext {
            method: &method,
            uri: &uri,
            request_headers: &request_headers,
            response: &response,
        };
        config.should_run(&context)
    };

    if !should_run {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();

    let html = inline_body(&config.served_dir, &document_path, body, config.body_limit).await?;

    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
    for name in FILE_RESPONSE_HEADERS {
        parts.headers.remove(name);
    }

    Ok(Response::from_parts(parts, Body::from(html)))
}
