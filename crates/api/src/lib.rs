//! HTTP API: configuration, routing, and the access-policy middleware.

pub mod app;
pub mod config;
pub mod middleware;
