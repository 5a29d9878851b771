//! Core error types

use thiserror::Error;

/// Errors raised while building core values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A length string was neither `auto` nor a pixel amount
    #[error("Invalid length: {0:?} (expected a number, \"<n>px\" or \"auto\")")]
    InvalidLength(String),

    /// A geometric value was NaN or infinite
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),
}
