//! API Middleware
//!
//! Middleware layers for authentication and request processing.

pub mod auth;

pub use auth::{bearer_token, require_auth, AuthClaims};
