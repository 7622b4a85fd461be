//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose details name the field
//! and a stable machine-readable code.

use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::domain::{EmailAddress, Error, MinorUnits, RiderStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidEmail,
    InvalidId,
    InvalidAmount,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let mut details = json!({ "field": field.as_str(), "code": code.as_str() });
    if let (Some(value), Some(object)) = (value, details.as_object_mut()) {
        object.insert("value".to_owned(), Value::String(value.to_owned()));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

/// Parse a path or body identifier, reporting the offending value.
pub(crate) fn parse_record_id<T: FromStr>(raw: &str, field: FieldName) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidId,
            format!("{} must be a valid record id", field.as_str()),
            Some(raw),
        )
    })
}

pub(crate) fn parse_email(raw: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| {
        field_error(
            field,
            ErrorCode::InvalidEmail,
            format!("{}: {err}", field.as_str()),
            Some(raw),
        )
    })
}

/// Optional email filter from a query string; blank counts as absent.
pub(crate) fn parse_email_filter(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<EmailAddress>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_email(value, field).map(Some),
    }
}

/// Required string field of a JSON document.
pub(crate) fn require_str<'a>(body: &'a Map<String, Value>, field: FieldName) -> Result<&'a str, Error> {
    body.get(field.as_str())
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Required email field of a JSON document.
pub(crate) fn require_email(
    body: &Map<String, Value>,
    field: FieldName,
) -> Result<EmailAddress, Error> {
    require_str(body, field).and_then(|raw| parse_email(raw, field))
}

/// Major-unit amount from a JSON field (number or numeric string).
pub(crate) fn require_amount(value: Option<&Value>, field: FieldName) -> Result<MinorUnits, Error> {
    MinorUnits::from_json(value).map_err(|err| {
        field_error(
            field,
            ErrorCode::InvalidAmount,
            format!("{}: {err}", field.as_str()),
            value.map(ToString::to_string).as_deref(),
        )
    })
}

pub(crate) fn parse_rider_status(raw: &str, field: FieldName) -> Result<RiderStatus, Error> {
    raw.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be one of pending, approved, rejected", field.as_str()),
            Some(raw),
        )
    })
}
