use axum::extract::FromRef;
use tracing::{info, warn};

use super::dto::LoginResponse;
use super::jwt::JwtKeys;
use super::password::password_matches;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::throttle::{AttemptOutcome, Decision};
use crate::users::repo as users_repo;

/// Looks the user up by email and checks the password. `None` on any mismatch.
pub async fn check_login_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<LoginResponse>> {
    let Some(user) = users_repo::find_by_email(state.gateway.as_ref(), email).await? else {
        return Ok(None);
    };
    let matched = user
        .str_field("password")
        .is_some_and(|hash| password_matches(password, hash));
    if !matched {
        return Ok(None);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user.id, email)?;
    Ok(Some(LoginResponse {
        user_id: user.id,
        email: email.to_string(),
        name: user.str_field("name").unwrap_or_default().to_string(),
        token,
    }))
}

/// Throttle check, credential check, then record the attempt. `email` must be normalized.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<LoginResponse> {
    if state.throttle.check(email) == Decision::Deny {
        return Err(AppError::Forbidden(
            "Too many failed login attempts. Please try again later.".into(),
        ));
    }

    match check_login_credentials(state, email, password).await? {
        Some(resp) => {
            state.throttle.record(email, AttemptOutcome::Success);
            info!(user_id = %resp.user_id, "user logged in");
            Ok(resp)
        }
        None => {
            state.throttle.record(email, AttemptOutcome::Failure);
            warn!(email = %email, "login failed");
            Err(AppError::InvalidCredentials("Wrong email or password".into()))
        }
    }
}
