//! Operator-facing error taxonomy
//!
//! Every variant is recoverable: it ends the current attempt and is surfaced
//! to the operator as a transient notice. None of them is retried internally.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OperatorError {
    /// Email or code was left empty
    #[error("Please enter both email and code")]
    MissingInput,

    /// Submitted credentials match no known identity
    #[error("Invalid email or code")]
    AuthenticationMismatch,

    /// Device command issued without a logged in operator
    #[error("{0} failed: Not authenticated")]
    NotAuthenticated(String),

    /// Transport-level failure reaching the device
    #[error("Failed to connect to ESP: {0}")]
    DeviceUnreachable(String),

    /// Device answered with a non-2xx status
    #[error("ESP rejected user: HTTP {0}")]
    DeviceRejected(String),

    /// Menu action without an implementation
    #[error("{0} not implemented yet")]
    NotImplemented(&'static str),
}
