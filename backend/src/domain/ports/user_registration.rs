//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, InsertOutcome, UserDraft};

/// What registration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new account was stored.
    Created(InsertOutcome),
    /// The email was already registered; nothing changed.
    AlreadyExists,
}

/// Domain use-case port for registering users.
///
/// Registering an existing email is a no-op, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    async fn register(&self, draft: UserDraft) -> Result<RegistrationOutcome, Error>;
}
