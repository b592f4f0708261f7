//! # Validated JSON Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and pass it through
//! [`extract_validated_json`], which normalizes deserialization failures
//! and semantic validation failures into [`AppError`] values (both 422).

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Semantic request validation, applied after deserialization.
pub trait Validate {
    /// Check business-level constraints; the error string becomes the
    /// client-visible message.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejection and validation failures.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Req {
        address: String,
    }

    impl Validate for Req {
        fn validate(&self) -> Result<(), String> {
            if self.address.is_empty() {
                return Err("address must be non-empty".into());
            }
            Ok(())
        }
    }

    #[test]
    fn valid_body_passes() {
        let req = extract_validated_json(Ok(Json(Req {
            address: "44 Lajpat Nagar".into(),
        })))
        .unwrap();
        assert_eq!(req.address, "44 Lajpat Nagar");
    }

    #[test]
    fn validation_failure_maps_to_validation_error() {
        let err = extract_validated_json(Ok(Json(Req {
            address: String::new(),
        })))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
