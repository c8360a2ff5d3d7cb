//! Utility functions.

pub(crate) mod path;
pub mod url;
