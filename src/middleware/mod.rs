//! Middleware for request observability.

pub mod logging;

pub use logging::{request_logging, REQUEST_ID_HEADER};
