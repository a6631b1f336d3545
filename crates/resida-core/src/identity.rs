//! Identity verification abstraction.
//!
//! Token verification itself is an external concern: the resolver receives an
//! opaque bearer token and returns a verified subject identity. The rest of
//! the system only ever sees [`SubjectIdentity`] values and never inspects
//! tokens directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A verified caller identity returned by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    /// Stable subject identifier assigned by the identity provider.
    pub subject_id: String,
    /// Email address attached to the identity, if any.
    pub email: Option<String>,
    /// Whether the identity provider has verified the email address.
    pub email_verified: bool,
}

impl SubjectIdentity {
    /// Creates a new subject identity with an unverified email.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: None,
            email_verified: false,
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Marks the email address as verified.
    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }
}

/// Verifies opaque bearer tokens against an external identity provider.
///
/// Implementations fail with an authentication error on invalid or expired
/// tokens and with an external error when the provider itself is unreachable.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Verifies a bearer token and returns the subject identity it encodes.
    async fn verify(&self, token: &str) -> Result<SubjectIdentity>;
}

/// Convenience constructor for the canonical invalid-token failure.
pub fn invalid_token() -> Error {
    Error::authentication().with_reason("invalid_token")
}
