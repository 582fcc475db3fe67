//! Core domain entities.
//!
//! Entities are plain data structures without storage concerns. Each comes
//! with a `New*` companion used as repository input:
//!
//! - [`Link`] / [`NewLink`] - slug → destination mapping
//! - [`Click`] / [`NewClick`] - one recorded redirect

pub mod click;
pub mod link;

pub use click::{Click, ClickId, NewClick, new_event_key};
pub use link::{Link, NewLink};
