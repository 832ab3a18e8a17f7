//! Application layer: services and use cases
//!
//! This layer orchestrates the selection model and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, TRANSPORT_FAILURE_MESSAGE};
pub use error_ext::IoResultExt;
