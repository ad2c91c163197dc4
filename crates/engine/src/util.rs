//! Internal helpers for record validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! normalization so every record enters the engine with the same shape.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Trim optional free text, mapping blank values to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Trim a required text field and reject it when blank.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRecord(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject amounts that cannot belong to a new record.
pub(crate) fn ensure_positive_amount(amount: MoneyCents) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(amount)
}

/// Map a stored minor-unit amount to a record amount.
///
/// Null or negative values are kept as `None` so aggregation can flag them.
pub(crate) fn stored_amount(value: Option<i64>) -> Option<MoneyCents> {
    value.filter(|v| *v >= 0).map(MoneyCents::new)
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}
