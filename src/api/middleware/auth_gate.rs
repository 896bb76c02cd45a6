//! Bearer token gate for mutating endpoints

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::UserId;
use crate::infrastructure::auth::TokenVerifier;

/// Outcome of checking one request
///
/// Every request starts `Unchecked` and ends in exactly one of the other
/// two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unchecked,
    Authorized(UserId),
    Rejected,
}

impl GateState {
    /// Verify the presented token; terminal states are returned unchanged
    pub fn evaluate(self, token: Option<&str>, verifier: &dyn TokenVerifier) -> Self {
        if self != Self::Unchecked {
            return self;
        }

        let Some(token) = token else {
            return Self::Rejected;
        };

        match verifier.verify(token) {
            Ok(caller) => Self::Authorized(caller),
            Err(e) => {
                debug!(error = %e, "Token rejected");
                Self::Rejected
            }
        }
    }
}

/// The verified caller, attached to the request by [`auth_gate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or_else(ApiError::unauthorized)
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Extract the token from `Authorization: Bearer`, then from `?token=`
pub fn extract_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(uri)
            .ok()
            .and_then(|Query(query)| query.token)
            .filter(|token| !token.is_empty())
    })
}

/// Middleware admitting only requests with a valid token
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = extract_token(request.headers(), request.uri());

    match GateState::Unchecked.evaluate(token.as_deref(), state.token_verifier.as_ref()) {
        GateState::Authorized(caller) => {
            request.extensions_mut().insert(Caller(caller));
            next.run(request).await
        }
        GateState::Unchecked | GateState::Rejected => {
            warn!(path = %request.uri().path(), "Rejected unauthenticated request");
            ApiError::unauthorized().into_response()
        }
    }
}
