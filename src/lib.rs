//! hello_web
//!
//! A small HTTP server built around a per-request callback: a fixed page,
//! a diagnostic page, and a static file responder with HTML error pages.
//! Connection handling and HTTP framing are done by hyper on tokio.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
pub use handler::{RequestInfo, Responder, StaticResponder};
