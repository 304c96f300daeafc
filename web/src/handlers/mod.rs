//! HTTP request handlers.

pub mod health;
pub mod operations;

pub use health::{health_check, root};
pub use operations::{dispatch, fallback, set_cookies};
