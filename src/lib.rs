//! Inline external import maps into HTML responses.
//!
//! Some runtimes support import maps only when they are embedded in the
//! document. This crate rewrites HTML responses on their way out of an
//! [`axum`] server: every `<script type="importmap" src="...">` element gets
//! the referenced JSON file as content and loses its `src` attribute.
//!
//! ```ignore
//! use importmap_inline::{serve, util::url::index_file_path, Config};
//!
//! let config = Config::new("public", index_file_path);
//! serve(config, 8000).await?;
//! ```

#![warn(missing_docs)]

pub mod body;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resolve;
pub mod serve;
pub mod transform;
pub mod util;

pub use body::{inline_body, HtmlBody};
pub use config::Config;
pub use error::Error;
pub use middleware::{import_map_middleware, RequestContext};
pub use resolve::resolve_src;
pub use serve::{router, serve};
pub use transform::inline_import_maps;
