use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{check_email, Validate};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        check_email("Email", &self.email)?;
        if self.password.is_empty() {
            return Err("\"Password\" is not allowed to be empty".into());
        }
        Ok(())
    }
}

/// Returned after a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}
