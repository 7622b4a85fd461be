//! Human-facing shipment tracking identifiers.
//!
//! A tracking identifier is minted once, when a parcel's payment settles. The
//! format is `SWIFT-YYYYMMDD-XXXXXX`: the brand prefix, the UTC calendar date
//! of settlement, and six uppercase hex digits drawn from three bytes of OS
//! entropy. Uniqueness is not checked; a collision needs two settlements on
//! the same day drawing the same 24 random bits.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Brand token leading every tracking identifier.
pub const TRACKING_ID_PREFIX: &str = "SWIFT";

const RANDOM_BYTES: usize = 3;
const DATE_DIGITS: usize = 8;

/// Validation errors returned when parsing stored tracking identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingIdValidationError {
    /// The value did not split into prefix, date, and random segments.
    #[error("tracking id must look like SWIFT-YYYYMMDD-XXXXXX")]
    Malformed,
}

/// Tracking identifier assigned to a paid parcel.
///
/// # Examples
/// ```
/// use swift_parcel::domain::TrackingId;
///
/// let id = TrackingId::parse("SWIFT-20250102-0A1B2C").expect("well formed");
/// assert_eq!(id.as_ref(), "SWIFT-20250102-0A1B2C");
/// assert!(TrackingId::parse("SWIFT-2025-0A1B2C").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingId(String);

impl TrackingId {
    /// Parse a previously minted identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TrackingIdValidationError> {
        let raw = raw.into();
        let mut segments = raw.split('-');
        let well_formed = matches!(
            (segments.next(), segments.next(), segments.next(), segments.next()),
            (Some(prefix), Some(date), Some(random), None)
                if prefix == TRACKING_ID_PREFIX
                    && date.len() == DATE_DIGITS
                    && date.bytes().all(|b| b.is_ascii_digit())
                    && random.len() == RANDOM_BYTES * 2
                    && random.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
        );
        if well_formed {
            Ok(Self(raw))
        } else {
            Err(TrackingIdValidationError::Malformed)
        }
    }
}

impl AsRef<str> for TrackingId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TrackingId> for String {
    fn from(value: TrackingId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TrackingId {
    type Error = TrackingIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Mints tracking identifiers from the injected clock and OS entropy.
///
/// Entropy comes from [`OsRng`]; if the operating system cannot supply random
/// bytes the process panics, since no recoverable path exists.
#[derive(Clone)]
pub struct TrackingIdGenerator {
    clock: Arc<dyn Clock>,
}

impl TrackingIdGenerator {
    /// Build a generator reading the date from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Mint a fresh identifier.
    pub fn generate(&self) -> TrackingId {
        let mut random = [0_u8; RANDOM_BYTES];
        OsRng.fill_bytes(&mut random);
        let date = self.clock.utc().format("%Y%m%d");
        TrackingId(format!(
            "{TRACKING_ID_PREFIX}-{date}-{}",
            hex::encode_upper(random)
        ))
    }
}

impl fmt::Debug for TrackingIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingIdGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedClock;
    use chrono::{TimeZone, Utc};
    use regex::Regex;
    use rstest::rstest;

    fn generator_at(year: i32, month: u32, day: u32) -> TrackingIdGenerator {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 23, 59, 59)
            .single()
            .expect("valid timestamp");
        TrackingIdGenerator::new(Arc::new(FixedClock::new(now)))
    }

    #[rstest]
    fn generated_ids_match_the_published_format() {
        let pattern = Regex::new(r"^SWIFT-\d{8}-[0-9A-F]{6}$").expect("valid regex");
        let generator = generator_at(2025, 3, 7);
        for _ in 0..64 {
            let id = generator.generate();
            assert!(pattern.is_match(id.as_ref()), "unexpected format: {id}");
        }
    }

    #[rstest]
    fn date_segment_uses_the_utc_calendar_date() {
        let id = generator_at(2024, 12, 31).generate();
        assert!(id.as_ref().starts_with("SWIFT-20241231-"), "got {id}");
    }

    #[rstest]
    fn generated_ids_parse_back() {
        let id = generator_at(2025, 1, 2).generate();
        assert_eq!(TrackingId::parse(id.to_string()), Ok(id));
    }

    #[rstest]
    #[case("")]
    #[case("SWIFT-20250102")]
    #[case("PARCEL-20250102-0A1B2C")]
    #[case("SWIFT-2025010-0A1B2C")]
    #[case("SWIFT-20250102-0a1b2c")]
    #[case("SWIFT-20250102-0A1B2C-1")]
    fn parse_rejects_malformed_values(#[case] raw: &str) {
        assert_eq!(
            TrackingId::parse(raw),
            Err(TrackingIdValidationError::Malformed)
        );
    }
}
