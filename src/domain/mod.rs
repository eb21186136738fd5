//! Domain layer - errors and rules that do not depend on HTTP
//!
//! Nothing here knows about state containers or views; the only framework
//! type it touches is `reqwest::Error`, for conversion.

pub mod errors;
pub mod policy;
pub mod validation;

pub use errors::{ApiError, ErrorKind, StateError, ValidationError};
