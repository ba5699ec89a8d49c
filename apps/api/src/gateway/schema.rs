//! Fail-closed validation for decoded model output.
//!
//! Decoding ignores unknown fields but nothing else: a missing or mistyped field,
//! or a value outside its bound, is a `SchemaError` naming the offending path.
//!
//! Bounds applied by the helpers below:
//! - scores: 0 – 100, ratings: 0 – 5
//! - money: finite and ≥ 0 unless the field is explicitly signed
//! - required text: non-blank
//! - lists standing in for a summary: non-empty

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("response field `{field}` {reason}")]
pub struct SchemaError {
    pub field: String,
    pub reason: String,
}

impl SchemaError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn nested_under(self, prefix: &str) -> Self {
        let field = if self.field.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}.{}", self.field)
        };
        Self { field, ..self }
    }
}

/// Implemented by every record the gateway hands back to callers.
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), SchemaError> {
        require_non_empty("$", self)?;
        validate_each("$", self)
    }
}

pub fn require_text(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        return Err(SchemaError::new(field, "must not be blank"));
    }
    Ok(())
}

pub fn require_finite(field: &str, value: f64) -> Result<(), SchemaError> {
    if !value.is_finite() {
        return Err(SchemaError::new(field, "must be a finite number"));
    }
    Ok(())
}

pub fn require_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), SchemaError> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(SchemaError::new(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

pub fn require_score(field: &str, value: f64) -> Result<(), SchemaError> {
    require_range(field, value, 0.0, 100.0)
}

pub fn require_amount(field: &str, value: f64) -> Result<(), SchemaError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(SchemaError::new(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

pub fn require_non_empty<T>(field: &str, items: &[T]) -> Result<(), SchemaError> {
    if items.is_empty() {
        return Err(SchemaError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Validates a nested record, prefixing any error path with `field`.
pub fn validate_nested<T: Validate>(field: &str, value: &T) -> Result<(), SchemaError> {
    value.validate().map_err(|e| e.nested_under(field))
}

/// Validates every element, reporting failures as `field[i].inner`.
pub fn validate_each<T: Validate>(field: &str, items: &[T]) -> Result<(), SchemaError> {
    for (i, item) in items.iter().enumerate() {
        validate_nested(&format!("{field}[{i}]"), item)?;
    }
    Ok(())
}
