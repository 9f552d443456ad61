//! HTTP adapter. Drives the ChatPort from axum routes.

pub mod handlers;
pub mod router;

pub use router::create_router;
