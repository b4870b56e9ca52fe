use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::Record;
use crate::validation::{check_email, check_length, Validate};

fn check_password(label: &str, value: &str) -> Result<(), String> {
    check_length(label, value, 6, 32)
}

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), String> {
        check_length("Name", &self.name, 1, 100)?;
        check_email("Email", &self.email)?;
        check_password("Password", &self.password)?;
        check_password("Password confirmation", &self.password_confirm)
    }
}

/// Body of `PUT /users/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), String> {
        check_length("Name", &self.name, 1, 100)?;
        check_email("Email", &self.email)
    }
}

/// Body of `POST /users/:id/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password_old: String,
    pub password_new: String,
    pub password_confirm: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), String> {
        check_password("Old password", &self.password_old)?;
        check_password("New password", &self.password_new)?;
        check_password("Password confirmation", &self.password_confirm)
    }
}

/// Public part of a user; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Record> for UserView {
    fn from(r: &Record) -> Self {
        Self {
            id: r.id,
            name: r.str_field("name").map(str::to_string),
            email: r.str_field("email").map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserId {
    pub id: Uuid,
}
