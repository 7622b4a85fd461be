//! Shipping fee amounts.
//!
//! Amounts are held in minor units (cents) so conversions to and from the
//! payment gateway are exact. Client input arrives in major units, either as a
//! JSON number or a numeric string; conversion multiplies by 100 and truncates
//! any digits beyond the second decimal place. Parsing goes through
//! `rust_decimal`, never through binary floating point.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Validation errors produced when reading a major-unit amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountValidationError {
    /// No amount was supplied.
    #[error("cost is required")]
    Missing,
    /// The supplied value was not a decimal number.
    #[error("cost must be a number")]
    NotNumeric,
    /// The supplied value was below zero.
    #[error("cost must not be negative")]
    Negative,
    /// The value does not fit the supported range.
    #[error("cost is too large")]
    OutOfRange,
}

/// A non-negative amount expressed in minor currency units.
///
/// Serialises as the major-unit number clients and stored documents use.
///
/// # Examples
/// ```
/// use swift_parcel::domain::MinorUnits;
///
/// let cost = MinorUnits::from_major_text("12.349").expect("numeric");
/// assert_eq!(cost.get(), 1234);
/// assert_eq!(MinorUnits::new(1000).expect("non-negative").as_major(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinorUnits(i64);

impl MinorUnits {
    /// Wrap a raw minor-unit amount, rejecting negatives.
    pub fn new(minor: i64) -> Result<Self, AmountValidationError> {
        if minor < 0 {
            Err(AmountValidationError::Negative)
        } else {
            Ok(Self(minor))
        }
    }

    /// Raw minor-unit value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }

    /// Major-unit value for display and persistence documents.
    #[must_use]
    pub fn as_major(self) -> f64 {
        // Precision loss only matters beyond 2^53 cents.
        #[expect(clippy::cast_precision_loss, reason = "amounts stay far below 2^53")]
        let minor = self.0 as f64;
        minor / 100.0
    }

    /// Read a major-unit amount from a JSON body field.
    ///
    /// Accepts numbers and numeric strings; `null` and absent fields count as
    /// missing.
    pub fn from_json(value: Option<&Value>) -> Result<Self, AmountValidationError> {
        match value {
            None | Some(Value::Null) => Err(AmountValidationError::Missing),
            Some(Value::Number(number)) => Self::from_major_text(&number.to_string()),
            Some(Value::String(text)) => Self::from_major_text(text),
            Some(_) => Err(AmountValidationError::NotNumeric),
        }
    }

    /// Convert decimal major-unit text (`"12"`, `"12.5"`, `"1e2"`) to minor units.
    pub fn from_major_text(raw: &str) -> Result<Self, AmountValidationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(AmountValidationError::Missing);
        }
        let major = parse_decimal(text).map_err(classify_parse_error)?;
        let minor = major
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(AmountValidationError::OutOfRange)?
            .trunc();
        if minor.is_zero() {
            return Ok(Self(0));
        }
        if minor.is_sign_negative() {
            return Err(AmountValidationError::Negative);
        }
        minor
            .to_i64()
            .map(Self)
            .ok_or(AmountValidationError::OutOfRange)
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let Some((mantissa, _)) = text.split_once(['e', 'E']) else {
        return Decimal::from_str(text);
    };
    Decimal::from_scientific(text).or_else(|err| match Decimal::from_str(mantissa) {
        // A zero mantissa stays zero whatever the exponent.
        Ok(base) if base.is_zero() => Ok(Decimal::ZERO),
        _ => Err(err),
    })
}

fn classify_parse_error(error: rust_decimal::Error) -> AmountValidationError {
    match error {
        rust_decimal::Error::ExceedsMaximumPossibleValue
        | rust_decimal::Error::LessThanMinimumPossibleValue
        | rust_decimal::Error::ScaleExceedsMaximumPrecision(_) => {
            AmountValidationError::OutOfRange
        }
        _ => AmountValidationError::NotNumeric,
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for MinorUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}
