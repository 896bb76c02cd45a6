//! Post endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderName, StatusCode},
    routing::{get, post, put},
    Router,
};
use tracing::debug;

use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::post::{validate_post, PostId, PostInput, PostWithAuthor};
use crate::domain::sanitize_post_fields;
use crate::infrastructure::post::DEFAULT_LIST_LIMIT;

/// Routes anyone may call
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{id}", get(get_post))
}

/// Routes that need a verified caller
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
}

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| PostId::new(id).ok())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid post ID '{}'", raw)))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(mut input): Json<PostInput>,
) -> Result<(StatusCode, Json<PostWithAuthor>), ApiError> {
    sanitize_post_fields(&mut input);
    validate_post(&input).map_err(|e| ApiError::unprocessable(e.to_string()))?;

    if input.author_id != caller.value() {
        debug!(caller = %caller, author_id = input.author_id, "Caller may only post as itself");
        return Err(ApiError::unauthorized());
    }

    let post = state.post_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    let posts = state.post_service.find_all(DEFAULT_LIST_LIMIT).await?;
    Ok(Json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostWithAuthor>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = state.post_service.find_by_id(id).await?;
    Ok(Json(post))
}

/// PUT /posts/{id}
///
/// Only title and content change; an `author_id` in the body must name the
/// caller or be omitted.
pub async fn update_post(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(mut input): Json<PostInput>,
) -> Result<Json<PostWithAuthor>, ApiError> {
    let id = parse_post_id(&id)?;

    if input.author_id != 0 && input.author_id != caller.value() {
        return Err(ApiError::unauthorized());
    }
    input.author_id = caller.value();

    sanitize_post_fields(&mut input);
    validate_post(&input).map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let post = state.post_service.update(id, caller, input.changes()).await?;
    Ok(Json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), ApiError> {
    let id = parse_post_id(&id)?;

    state.post_service.delete(id, caller).await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(HeaderName::from_static("entity"), id.to_string())],
    ))
}
