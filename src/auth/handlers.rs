use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::dto::{LoginRequest, LoginResponse};
use super::services;
use crate::{error::AppResult, state::AppState, validation::normalize_email, validation::ValidJson};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/authentication/login", post(login))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&payload.email);
    let resp = services::login(&state, &email, &payload.password).await?;
    Ok(Json(resp))
}
