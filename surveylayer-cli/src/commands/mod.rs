//! CLI command implementations.
//!
//! - [`config`] - Configuration file management (path, show, init)
//! - [`distance`] - Great-circle distance between two points
//! - [`route`] - Order the legs of a survey zone

pub mod config;
pub mod distance;
pub mod route;
