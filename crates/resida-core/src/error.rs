//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source error in [`Error`], wrapping any error that implements
/// the standard `Error` trait while keeping Send and Sync bounds for
/// multi-threaded contexts.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur across resida operations.
///
/// The categories follow the taxonomy used throughout the service layer:
/// validation, authentication, authorization, state conflict, not-found, and
/// operational (external) failures. Operational failures propagate the
/// backend's own error unchanged and are never downgraded to a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed (missing or malformed input).
    Validation,
    /// Caller identity could not be verified.
    Authentication,
    /// Caller is resolved but forbidden for the requested scope or role.
    Authorization,
    /// Target is already in a terminal or conflicting state.
    Conflict,
    /// Referenced building, unit, invitation, or account is absent.
    NotFound,
    /// Backend adapter or identity resolver failure, reported as-is.
    External,
    /// Internal invariant violation.
    Internal,
}

/// A structured error type carrying a stable machine-readable reason code.
///
/// Every domain failure yields a snake_case `reason` string (for example
/// `unit_already_assigned`) that callers can match on without parsing the
/// human-readable message.
#[derive(Debug, Error)]
#[error("{}{}", reason.unwrap_or_else(|| (*kind).into()), message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Stable machine-readable reason code.
    pub reason: Option<&'static str>,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            reason: None,
            message: None,
            source: None,
        }
    }

    /// Adds a stable reason code to this error.
    pub fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new authorization error.
    pub fn authorization() -> Self {
        Self::new(ErrorKind::Authorization)
    }

    /// Creates a new state-conflict error.
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new external (operational) error.
    pub fn external() -> Self {
        Self::new(ErrorKind::External)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the stable reason code, falling back to the kind string.
    pub fn reason(&self) -> &'static str {
        self.reason.unwrap_or_else(|| self.kind.into())
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}
