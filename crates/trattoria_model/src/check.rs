//! Scalar attribute checks shared by the entity constructors.

use chrono::{DateTime, Utc};
use trattoria_foundation::{EntityId, Error, Money, Result};

pub(crate) fn identity(id: EntityId) -> Result<EntityId> {
    if id.value() == 0 {
        return Err(Error::validation("id", "must be positive"));
    }
    Ok(id)
}

pub(crate) fn non_blank(field: &str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_non_blank(field: &str, value: Option<String>) -> Result<Option<String>> {
    value.map(|v| non_blank(field, v)).transpose()
}

pub(crate) fn non_negative(field: &str, amount: Money) -> Result<Money> {
    if amount.is_negative() {
        return Err(Error::validation(field, "cannot be negative"));
    }
    Ok(amount)
}

pub(crate) fn positive(field: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(Error::validation(field, "must be greater than 0"));
    }
    Ok(value)
}

pub(crate) fn not_future(field: &str, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if at > Utc::now() {
        return Err(Error::validation(field, "cannot be in the future"));
    }
    Ok(at)
}

/// Trims entries, rejects blanks, and drops repeats.
pub(crate) fn allergens<I, S>(values: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut result: Vec<String> = Vec::new();
    for value in values {
        let value = non_blank("allergens", value)?;
        if !result.contains(&value) {
            result.push(value);
        }
    }
    Ok(result)
}
