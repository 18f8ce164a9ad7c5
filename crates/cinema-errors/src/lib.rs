//! Typed server errors for the cinema backend
//!
//! Every failure that can reach a client is a [`ServerError`]: a kind tag plus
//! the HTTP status, machine-readable code and human message that the response
//! translator writes out verbatim.

mod error;
mod kind;
mod response;

pub use error::{ServerError, ServerResult};
pub use kind::ErrorKind;
pub use response::ErrorBody;
