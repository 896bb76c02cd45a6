//! User endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderName, StatusCode},
    routing::{get, put},
    Router,
};
use tracing::debug;

use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{validate_patch, validate_user, User, UserId, UserInput, UserPatch, ValidationMode};
use crate::domain::{sanitize_user_fields, sanitize_user_patch};
use crate::infrastructure::user::DEFAULT_LIST_LIMIT;

/// Routes anyone may call
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
}

/// Routes that need a verified caller
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/users/{id}", put(update_user).delete(delete_user))
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<u32>()
        .ok()
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid user ID '{}'", raw)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    sanitize_user_fields(&mut input);
    validate_user(&input, ValidationMode::Create)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let user = state.user_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.user_service.find_all(DEFAULT_LIST_LIMIT).await?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_user_id(&id)?;
    let user = state.user_service.find_by_id(id).await?;
    Ok(Json(user))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(mut patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    let id = parse_user_id(&id)?;
    if caller != id {
        debug!(caller = %caller, user_id = %id, "Caller may only update itself");
        return Err(ApiError::unauthorized());
    }

    if patch.is_empty() {
        return Err(ApiError::unprocessable("No fields to update"));
    }

    sanitize_user_patch(&mut patch);
    validate_patch(&patch).map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let user = state.user_service.update(id, patch).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
///
/// The user's posts are removed with the account.
pub async fn delete_user(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), ApiError> {
    let id = parse_user_id(&id)?;
    if caller != id {
        debug!(caller = %caller, user_id = %id, "Caller may only delete itself");
        return Err(ApiError::unauthorized());
    }

    if state.user_service.delete(id).await? > 0 {
        state.post_service.delete_by_author(id).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(HeaderName::from_static("entity"), id.to_string())],
    ))
}
