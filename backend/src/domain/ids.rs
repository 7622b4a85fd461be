//! Opaque record identifiers.
//!
//! Every collection keys its documents by a UUID the server generates on
//! insert. Each collection gets its own newtype so a parcel id can never be
//! passed where a rider id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing identifiers from client input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdValidationError {
    /// The value was blank.
    #[error("identifier must not be empty")]
    Empty,
    /// The value was not a UUID.
    #[error("identifier must be a valid UUID")]
    InvalidId,
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier from its textual form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, RecordIdValidationError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(RecordIdValidationError::Empty);
                }
                Uuid::parse_str(trimmed)
                    .map(Self)
                    .map_err(|_| RecordIdValidationError::InvalidId)
            }

            /// Borrow the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = RecordIdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_record_id!(
    /// Identifier of a submitted parcel.
    ParcelId
);
define_record_id!(
    /// Identifier of a stored payment row.
    PaymentId
);
define_record_id!(
    /// Identifier of a registered user.
    UserId
);
define_record_id!(
    /// Identifier of a rider application.
    RiderId
);
