//! Rider applications.
//!
//! An application starts pending. Staff set it to approved or rejected; an
//! approval also promotes the applicant's user account to the rider role.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, PassthroughFields, RiderId};

/// Document keys owned by the typed part of a rider application.
pub const RIDER_RESERVED_FIELDS: &[&str] = &["id", "_id", "email", "status", "createdAt"];

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiderStatus {
    Pending,
    Approved,
    Rejected,
}

impl RiderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether moving to this status promotes the applicant.
    #[must_use]
    pub const fn promotes_applicant(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether an application in this status may be set to `next`.
    ///
    /// Only pending applications are decided; repeating a decision is
    /// allowed and leaves the status unchanged.
    #[must_use]
    pub fn allows_transition_to(self, next: Self) -> bool {
        self == Self::Pending || self == next
    }
}

impl fmt::Display for RiderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unrecognised status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of pending, approved, rejected (got {0:?})")]
pub struct UnknownRiderStatus(pub String);

impl FromStr for RiderStatus {
    type Err = UnknownRiderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownRiderStatus(other.to_owned())),
        }
    }
}

/// Application payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderDraft {
    pub email: EmailAddress,
    pub details: PassthroughFields,
}

/// A stored application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    id: RiderId,
    email: EmailAddress,
    status: RiderStatus,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: PassthroughFields,
}

impl Rider {
    /// Accept a new application in the pending state.
    #[must_use]
    pub fn apply(id: RiderId, draft: RiderDraft, created_at: DateTime<Utc>) -> Self {
        Self::restore(id, draft, RiderStatus::Pending, created_at)
    }

    #[must_use]
    pub fn restore(
        id: RiderId,
        draft: RiderDraft,
        status: RiderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: draft.email,
            status,
            created_at,
            details: draft.details,
        }
    }

    pub fn id(&self) -> RiderId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn status(&self) -> RiderStatus {
        self.status
    }

    /// Overwrite the status; returns whether it changed.
    pub fn set_status(&mut self, status: RiderStatus) -> bool {
        let changed = self.status != status;
        self.status = status;
        changed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn details(&self) -> &PassthroughFields {
        &self.details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Map, json};

    fn draft() -> RiderDraft {
        let mut extra = Map::new();
        extra.insert("region".into(), json!("Dhaka"));
        extra.insert("status".into(), json!("approved"));
        RiderDraft {
            email: EmailAddress::new("r@x.com").expect("valid email"),
            details: PassthroughFields::from_map(extra, RIDER_RESERVED_FIELDS),
        }
    }

    #[rstest]
    fn applications_start_pending_whatever_the_client_sends() {
        let created_at = Utc
            .with_ymd_and_hms(2025, 2, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let rider = Rider::apply(RiderId::random(), draft(), created_at);
        assert_eq!(rider.status(), RiderStatus::Pending);
        let value = serde_json::to_value(&rider).expect("serialise");
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["region"], json!("Dhaka"));
    }

    #[rstest]
    #[case("pending", RiderStatus::Pending)]
    #[case(" approved ", RiderStatus::Approved)]
    #[case("rejected", RiderStatus::Rejected)]
    fn parses_statuses(#[case] raw: &str, #[case] expected: RiderStatus) {
        assert_eq!(raw.parse::<RiderStatus>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_statuses() {
        assert!("active".parse::<RiderStatus>().is_err());
    }

    #[rstest]
    #[case(RiderStatus::Pending, false)]
    #[case(RiderStatus::Approved, true)]
    #[case(RiderStatus::Rejected, false)]
    fn only_approval_promotes(#[case] status: RiderStatus, #[case] expected: bool) {
        assert_eq!(status.promotes_applicant(), expected);
    }

    #[rstest]
    #[case(RiderStatus::Pending, RiderStatus::Approved, true)]
    #[case(RiderStatus::Pending, RiderStatus::Rejected, true)]
    #[case(RiderStatus::Approved, RiderStatus::Approved, true)]
    #[case(RiderStatus::Approved, RiderStatus::Rejected, false)]
    #[case(RiderStatus::Rejected, RiderStatus::Approved, false)]
    #[case(RiderStatus::Approved, RiderStatus::Pending, false)]
    fn decisions_are_final(
        #[case] from: RiderStatus,
        #[case] to: RiderStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.allows_transition_to(to), allowed);
    }
}
