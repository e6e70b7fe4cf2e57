//! Request validation utilities for consistent validation across handlers
//!
//! Deserialisation already guarantees every field is present and of the right
//! type. This module adds the value constraints serde cannot express, so a
//! request reaches the engine either fully valid or not at all.

use diagnosis_engine::PatientRecord;

use crate::error::ApiError;

/// Trait for validating request payloads
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails
    ///
    /// # Errors
    ///
    /// Returns a validation [`ApiError`] naming the first offending field.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
///
/// # Usage
///
/// ```rust,ignore
/// validate_field!("Age", self.age >= 0.0, "Age must be 0 or more");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::invalid_field($field, $message));
        }
    };
}

/// Macro for validating required fields (non-blank strings)
///
/// # Usage
///
/// ```rust,ignore
/// validate_required!("Gender", self.gender, "Gender is required");
/// ```
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $value:expr, $message:expr) => {
        if $value.trim().is_empty() {
            return Err($crate::error::ApiError::missing_field($field, $message));
        }
    };
}

/// Macro for rejecting NaN and infinite measurements
///
/// # Usage
///
/// ```rust,ignore
/// validate_finite!("Systolic", self.systolic);
/// ```
#[macro_export]
macro_rules! validate_finite {
    ($field:expr, $value:expr) => {
        $crate::validate_field!(
            $field,
            $value.is_finite(),
            format!("{} must be a finite number", $field)
        );
    };
}

impl RequestValidation for PatientRecord {
    fn validate(&self) -> Result<(), ApiError> {
        validate_finite!("Age", self.age);
        validate_field!("Age", self.age >= 0.0, "Age must be 0 or more");

        for (field, value) in self.measurements() {
            validate_finite!(field, value);
        }

        for (field, value) in self.categories() {
            validate_required!(field, value, format!("{field} is required"));
        }

        Ok(())
    }
}
