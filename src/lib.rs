//! REMIT-AI quote engine: USD -> KRW remittance pricing, the tool layer on top
//! of it, and the HTTP API that serves both.

pub mod api;
pub mod config;
pub mod middleware;
pub mod quote;
pub mod tools;
