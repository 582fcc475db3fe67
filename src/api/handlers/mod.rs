//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod dashboard;
pub mod health;
pub mod index;
pub mod links;
pub mod redirect;

pub use dashboard::dashboard_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use links::{add_link_handler, delete_link_handler, list_links_handler};
pub use redirect::redirect_handler;
