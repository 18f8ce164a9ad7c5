//! Session tokens for the cinema backend
//!
//! [`TokenService`] issues signed, time-bounded JWTs over a free-form
//! [`Claims`] map and verifies them, either strictly or ignoring expiry for
//! refresh flows. Failures are [`TokenError`]s, which convert into the
//! [`cinema_errors::ServerError`] taxonomy.

pub mod claims;
pub mod config;
pub mod jwt;

pub use claims::{Claims, EXP_CLAIM, SUB_CLAIM};
pub use config::{ConfigError, TokenConfig};
pub use jwt::{TokenError, TokenService};

// Re-export useful types
pub use jsonwebtoken::Algorithm;
