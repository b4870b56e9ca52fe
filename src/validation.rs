//! Request-body validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

/// Field rules a request body must satisfy after it deserializes.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// `Json<T>` that answers malformed bodies and rule violations with `VALIDATION_ERROR`.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "rejected request body");
            AppError::Validation(e.body_text())
        })?;
        value.validate().map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Character-count bounds, inclusive.
pub(crate) fn check_length(label: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("\"{label}\" length must be at least {min} characters long"));
    }
    if len > max {
        return Err(format!(
            "\"{label}\" length must be less than or equal to {max} characters long"
        ));
    }
    Ok(())
}

pub(crate) fn check_email(label: &str, value: &str) -> Result<(), String> {
    if is_valid_email(value.trim()) {
        Ok(())
    } else {
        Err(format!("\"{label}\" must be a valid email"))
    }
}

/// Trimmed and lower-cased, the form emails are stored and throttled under.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
