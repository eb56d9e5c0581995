//! Shared primitives used across Vantage crates.

use core::fmt;
use std::time::Duration;

/// Result alias used across the workspace.
pub type SpyResult<T> = Result<T, SpyError>;

/// Monotonic time since the page view started, supplied by the host.
pub type Timestamp = Duration;

/// Broad classification of an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed page configuration, raised at configuration time.
    Configuration,
    /// An observer target is not in the document yet. Transient.
    ElementNotMounted,
    /// Any other document-model failure.
    Document,
    /// Anything outside the `config.` and `dom.` namespaces, such as `fragment.*`.
    Other,
}

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyError {
    pub code: &'static str,
    pub message: String,
}

impl SpyError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        if self.code.starts_with("config.") {
            ErrorKind::Configuration
        } else if self.code == "dom.element_not_mounted" {
            ErrorKind::ElementNotMounted
        } else if self.code.starts_with("dom.") {
            ErrorKind::Document
        } else {
            ErrorKind::Other
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

impl fmt::Display for SpyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for SpyError {}
