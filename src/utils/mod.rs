//! Utility functions for input validation and request handling.
//!
//! - [`slug`] - Slug validation
//! - [`url_normalizer`] - Destination URL normalization
//! - [`client_meta`] - Click metadata extraction from requests

pub mod client_meta;
pub mod slug;
pub mod url_normalizer;
