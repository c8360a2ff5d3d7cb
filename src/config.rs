//! Configure the import map inliner.

use std::path::PathBuf;

use crate::middleware::RequestContext;

/// Configuration for the import map inliner.
///
/// A configuration is created once and shared by all requests.
pub struct Config {
    /// Directory of served files.
    pub served_dir: PathBuf,

    /// Map the path of a request URL to the path of the served file, relative
    /// to `served_dir` (e.g. `/` to `/index.html`).
    ///
    /// See [`index_file_path`][crate::util::url::index_file_path] for the
    /// mapping used by [`ServeDir`][tower_http::services::ServeDir].
    pub file_path_of_request_url: Box<dyn Fn(&str) -> String + Send + Sync>,

    /// Predicate that determines whether an HTML response is processed or
    /// not.
    ///
    /// If set to `None`, every HTML response is processed.
    #[allow(clippy::type_complexity)]
    pub should_run: Option<Box<dyn Fn(&RequestContext) -> bool + Send + Sync>>,

    /// Maximum size in bytes of a streamed response body.
    pub body_limit: usize,
}

impl Config {
    /// Create a configuration serving files from `served_dir`.
    pub fn new(
        served_dir: impl Into<PathBuf>,
        file_path_of_request_url: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            served_dir: served_dir.into(),
            file_path_of_request_url: Box::new(file_path_of_request_url),
            should_run: None,
            body_limit: usize::MAX,
        }
    }

    /// Set the predicate that determines whether an HTML response is processed.
    pub fn with_should_run(
        self,
        should_run: impl Fn(&RequestContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            should_run: Some(Box::new(should_run)),
            ..self
        }
    }

    /// Set the maximum size in bytes of a streamed response body.
    pub fn with_body_limit(self, body_limit: usize) -> Self {
        Self { body_limit, ..self }
    }

    /// Evaluate the `should_run` predicate.
    pub fn should_run(&self, context: &RequestContext) -> bool {
        self.should_run
            .as_ref()
            .map_or(true, |should_run| should_run(context))
    }

    /// Return the path of the file served for a request URL path.
    pub fn document_path(&self, url_path: &str) -> PathBuf {
        let file_path = (self.file_path_of_request_url)(url_path);
        self.served_dir.join(file_path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("served_dir", &self.served_dir)
            .field("should_run", &self.should_run.is_some())
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;
    use crate::util::url::index_file_path;

    #[test]
    #[cfg(unix)]
    fn document_path() {
        let config = Config::new("/site", index_file_path);

        assert_eq!(
            config.document_path("/"),
            PathBuf::from("/site/index.html")
        );
        assert_eq!(
            config.document_path("/pages/a.html"),
            PathBuf::from("/site/pages/a.html")
        );
        assert_eq!(
            config.document_path("/pages/"),
            PathBuf::from("/site/pages/index.html")
        );
    }

    #[test]
    #[cfg(unix)]
    fn custom_file_path_of_request_url() {
        let config = Config::new("/site", |url: &str| format!("{url}.html"));

        assert_eq!(
            config.document_path("/about"),
            PathBuf::from("/site/about.html")
        );
    }

    #[test]
    fn default_settings() {
        let config = Config::new("/site", index_file_path);

        assert!(config.should_run.is_none());
        assert_eq!(config.body_limit, usize::MAX);

        let config = config.with_body_limit(1024);

        assert_eq!(config.body_limit, 1024);
    }
}
