//! Domain layer containing entities, repository contracts and the click worker.
//!
//! Nothing here depends on the HTTP layer or on a particular database.
//!
//! # Architecture
//!
//! - [`entities`] - Links and clicks
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click captured by the redirect handler
//! - [`click_worker`] - Background writer for queued clicks
//! - [`click_counters`] - Recorded / failed / dropped counters
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the slug and builds a [`click_event::ClickEvent`]
//! 2. [`crate::application::services::ClickDispatcher`] queues it or writes it directly
//! 3. [`click_worker::run_click_worker`] writes queued events with retry logic
//! 4. Clicks are persisted via [`repositories::ClickRepository`]

pub mod click_counters;
pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
