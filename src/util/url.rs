//! Utility functions for URLs found in HTML attributes.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Check if a URL starts with a scheme (e.g. `https:` or `data:`).
fn has_scheme(url: &str) -> bool {
    let end = url
        .char_indices()
        .find(|(i, c)| match i {
            0 => !c.is_ascii_alphabetic(),
            _ => !c.is_ascii_alphanumeric() && !['+', '-', '.'].contains(c),
        });

    matches!(end, Some((i, ':')) if i > 0)
}

/// Return the decoded path of a URL if it refers to a local file.
///
/// URLs with a scheme or an authority (`//host/...`) are not local and return
/// `None`. The query and the fragment are dropped.
pub(crate) fn local_path(url: &str) -> Option<Cow<'_, str>> {
    let url = url.trim();

    if has_scheme(url) || url.starts_with("//") {
        return None;
    }

    let end = url.find(['?', '#']).unwrap_or(url.len());

    Some(percent_decode_str(&url[..end]).decode_utf8_lossy())
}

/// Map a URL path to the path of the file it designates in a served directory.
///
/// The path is percent-decoded and `index.html` is appended to directory
/// paths, so `/` returns `/index.html` and `/blog/` returns
/// `/blog/index.html`.
pub fn index_file_path(url_path: &str) -> String {
    let mut path = percent_decode_str(url_path).decode_utf8_lossy().into_owned();

    if path.is_empty() || path.ends_with('/') {
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str("index.html");
    }

    path
}
