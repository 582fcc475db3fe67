//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_dispatcher;
pub mod click_service;
pub mod link_service;

pub use auth_service::AuthService;
pub use click_dispatcher::{ClickDispatcher, DispatchOutcome, QueueStatus};
pub use click_service::{ClickService, MAX_RECENT_LIMIT};
pub use link_service::LinkService;
