//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate repositories, keeping transport concerns out
//! of the data layer.

pub mod course_service;
pub mod enrollment_service;
pub mod user_service;

use crate::errors::ServiceError;
use validator::ValidationErrors;

/// Flattens validator output into a single validation error message.
pub fn validation_error(validation_errors: ValidationErrors) -> ServiceError {
    let error_messages: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect();

    ServiceError::validation(error_messages.join(", "))
}
