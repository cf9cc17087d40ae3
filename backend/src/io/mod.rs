//! # IO Module
//!
//! Interface layer exposing the payments service over HTTP.
//!
//! - **rest**: route handlers, request decoding and error encoding
//! - **server**: listener lifecycle and graceful shutdown

pub mod rest;
pub mod server;

pub use rest::{api_router, ApiError};
pub use server::{Server, ServerConfig};
