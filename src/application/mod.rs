//! Application layer services implementing business logic.
//!
//! Services validate input, apply the recording policy and hand storage work
//! to the repository traits. HTTP handlers and the admin CLI only talk to
//! this layer.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link upsert, resolution and removal
//! - [`services::click_service::ClickService`] - Bounded click writes and reporting
//! - [`services::click_dispatcher::ClickDispatcher`] - Async queue or sync write per redirect
//! - [`services::auth_service::AuthService`] - Admin shared-secret check

pub mod services;
