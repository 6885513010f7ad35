//! HTTP-facing building blocks shared by the service's handlers.

pub mod errors;

pub use errors::{DecodeError, RestError};
