use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::dto::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserId, UserView};
use super::services;
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    listing::{ListParams, ListQuery, PageResult},
    outcome::Outcome,
    state::AppState,
    validation::{normalize_email, ValidJson},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/change-password", post(change_password))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PageResult<UserView>>> {
    debug!(%caller, "list users");
    let query = ListQuery::from(params);
    let page = services::list_users(state.gateway.as_ref(), &query).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>> {
    debug!(%caller, "get user");
    let user = services::get_user(state.gateway.as_ref(), &id)
        .await?
        .or_error("Unknown user", "Unknown user")?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> AppResult<Json<UserView>> {
    if payload.password != payload.password_confirm {
        return Err(AppError::InvalidPassword(
            "Password confirmation mismatched".into(),
        ));
    }

    let email = normalize_email(&payload.email);
    if services::email_is_registered(state.gateway.as_ref(), &email, None).await? {
        return Err(AppError::EmailAlreadyTaken(
            "Email is already registered".into(),
        ));
    }

    let user = services::create_user(state.gateway.as_ref(), &payload.name, &email, &payload.password)
        .await
        .or_error("Unknown user", "Failed to create user")?;
    info!(user_id = %user.id, "user created");
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<UserView>> {
    let email = normalize_email(&payload.email);
    let excluding = Uuid::parse_str(&id).ok();
    if services::email_is_registered(state.gateway.as_ref(), &email, excluding).await? {
        return Err(AppError::EmailAlreadyTaken(
            "Email is already registered".into(),
        ));
    }

    let user = services::update_user(state.gateway.as_ref(), &id, &payload.name, &email)
        .await
        .or_error("Unknown user", "Failed to update user")?;
    info!(%caller, user_id = %user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserId>> {
    let id = services::delete_user(state.gateway.as_ref(), &id)
        .await
        .or_error("Unknown user", "Failed to delete user")?;
    info!(%caller, user_id = %id, "user deleted");
    Ok(Json(UserId { id }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<ChangePasswordRequest>,
) -> AppResult<Json<UserId>> {
    if payload.password_new != payload.password_confirm {
        return Err(AppError::InvalidPassword(
            "Password confirmation mismatched".into(),
        ));
    }

    match services::check_password(state.gateway.as_ref(), &id, &payload.password_old).await {
        Outcome::Done(true) => {}
        Outcome::Done(false) => {
            return Err(AppError::InvalidCredentials("Wrong password".into()));
        }
        Outcome::NotFound => return Err(AppError::NotFound("Unknown user".into())),
        Outcome::Failed => {
            return Err(AppError::UnprocessableEntity(
                "Failed to change password".into(),
            ));
        }
    }

    let id = services::change_password(state.gateway.as_ref(), &id, &payload.password_new)
        .await
        .or_error("Unknown user", "Failed to change password")?;
    info!(%caller, user_id = %id, "password changed");
    Ok(Json(UserId { id }))
}
