//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, GenreId, ItemKind, TmdbId, TrendingPeriod};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    OutOfRange,
    InvalidItemKind,
    InvalidPeriod,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidItemKind => "invalid_item_kind",
            ErrorCode::InvalidPeriod => "invalid_period",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a whole number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

fn out_of_range_error(field: FieldName, value: impl ToString) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a positive number"))
        .with_value(ErrorCode::OutOfRange, value.to_string())
}

/// Validate a catalog id carried in a JSON body.
pub(crate) fn parse_tmdb_id(value: i32, field: FieldName) -> Result<TmdbId, Error> {
    TmdbId::try_new(value).map_err(|_| out_of_range_error(field, value))
}

/// Validate a catalog id carried in a path segment.
pub(crate) fn parse_tmdb_id_segment(value: &str, field: FieldName) -> Result<TmdbId, Error> {
    let raw = value
        .parse::<i32>()
        .map_err(|_| invalid_number_error(field, value))?;
    parse_tmdb_id(raw, field)
}

/// Validate a genre id carried in a path segment.
pub(crate) fn parse_genre_id_segment(value: &str, field: FieldName) -> Result<GenreId, Error> {
    value
        .parse::<i32>()
        .map(GenreId::new)
        .map_err(|_| invalid_number_error(field, value))
}

/// Validate an item kind such as `movie`.
pub(crate) fn parse_item_kind(value: &str, field: FieldName) -> Result<ItemKind, Error> {
    ItemKind::new(value).map_err(|error| {
        let field_name = field.as_str();
        ValidationError::new(field_name, error.to_string())
            .with_value(ErrorCode::InvalidItemKind, value)
    })
}

/// Validate an optional 1-based page query parameter, defaulting to page 1.
pub(crate) fn parse_page(value: Option<String>, field: FieldName) -> Result<u32, Error> {
    let Some(raw) = value else {
        return Ok(1);
    };
    let page = raw
        .parse::<u32>()
        .map_err(|_| invalid_number_error(field, &raw))?;
    if page == 0 {
        return Err(out_of_range_error(field, page));
    }
    Ok(page)
}

/// Validate an optional trending period, defaulting to the daily window.
pub(crate) fn parse_trending_period(
    value: Option<String>,
    field: FieldName,
) -> Result<TrendingPeriod, Error> {
    let Some(raw) = value else {
        return Ok(TrendingPeriod::default());
    };
    raw.parse::<TrendingPeriod>().map_err(|_| {
        let field_name = field.as_str();
        ValidationError::new(field_name, format!("{field_name} must be `day` or `week`"))
            .with_value(ErrorCode::InvalidPeriod, raw.as_str())
    })
}
