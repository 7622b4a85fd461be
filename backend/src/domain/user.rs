//! Registered users.
//!
//! Users are keyed by email. Every account starts with the `user` role; the
//! only path to `rider` is an approved rider application. The `admin` role is
//! reserved and never assigned by the server.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, PassthroughFields, UserId};

/// Document keys owned by the typed part of a user.
pub const USER_RESERVED_FIELDS: &[&str] = &["id", "_id", "email", "role", "createdAt"];

/// Account privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Rider,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Rider => "rider",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct UnknownUserRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownUserRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "rider" => Ok(Self::Rider),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownUserRole(other.to_owned())),
        }
    }
}

/// Registration payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub email: EmailAddress,
    pub details: PassthroughFields,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: EmailAddress,
    role: UserRole,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: PassthroughFields,
}

impl User {
    /// Register a new account with the default role.
    #[must_use]
    pub fn register(id: UserId, draft: UserDraft, created_at: DateTime<Utc>) -> Self {
        Self::restore(id, draft, UserRole::User, created_at)
    }

    /// Rebuild an account from stored columns.
    #[must_use]
    pub fn restore(id: UserId, draft: UserDraft, role: UserRole, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email,
            role,
            created_at,
            details: draft.details,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Overwrite the role; returns whether it changed.
    pub fn set_role(&mut self, role: UserRole) -> bool {
        let changed = self.role != role;
        self.role = role;
        changed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn details(&self) -> &PassthroughFields {
        &self.details
    }
}
