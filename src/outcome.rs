use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::gateway::{Gateway, Record};

/// Result of a single-record service call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    /// No record with the requested id (or the id could not be parsed).
    NotFound,
    /// The record existed but the gateway write did not go through.
    Failed,
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(v) => Outcome::Done(f(v)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed => Outcome::Failed,
        }
    }

    pub fn or_error(self, not_found: &str, failed: &str) -> Result<T, AppError> {
        match self {
            Outcome::Done(v) => Ok(v),
            Outcome::NotFound => Err(AppError::NotFound(not_found.to_string())),
            Outcome::Failed => Err(AppError::UnprocessableEntity(failed.to_string())),
        }
    }
}

/// Loads the record a write is about to touch. Lookup failures count as `Failed`.
pub async fn existing_record(gw: &dyn Gateway, collection: &str, id: &str) -> Outcome<Record> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Outcome::NotFound;
    };
    match gw.find_by_id(collection, id).await {
        Ok(Some(record)) => Outcome::Done(record),
        Ok(None) => Outcome::NotFound,
        Err(e) => {
            error!(error = %e, collection = %collection, %id, "record lookup failed");
            Outcome::Failed
        }
    }
}
