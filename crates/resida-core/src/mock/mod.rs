//! Mock identity resolver for testing.
//!
//! This module provides a static, in-memory [`IdentityResolver`] that maps
//! known tokens to fixed subject identities. It is useful for unit and
//! integration tests that exercise caller resolution without a real identity
//! provider.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! resida-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::identity::{IdentityResolver, SubjectIdentity, invalid_token};
use crate::Result;

/// In-memory identity resolver backed by a token → identity map.
///
/// Unknown tokens fail with the same authentication error a real provider
/// would return for an invalid or expired token.
#[derive(Debug, Default)]
pub struct StaticIdentityResolver {
    identities: Mutex<HashMap<String, SubjectIdentity>>,
}

impl StaticIdentityResolver {
    /// Creates an empty resolver that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that will resolve to the given identity.
    pub fn register(&self, token: impl Into<String>, identity: SubjectIdentity) {
        self.identities
            .lock()
            .expect("identity map lock poisoned")
            .insert(token.into(), identity);
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn verify(&self, token: &str) -> Result<SubjectIdentity> {
        self.identities
            .lock()
            .expect("identity map lock poisoned")
            .get(token)
            .cloned()
            .ok_or_else(invalid_token)
    }
}
