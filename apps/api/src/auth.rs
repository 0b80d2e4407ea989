//! Acting-user resolution.
//!
//! Credentials are verified upstream; the gateway forwards the authenticated
//! user's id in `x-user-id`. `identify` resolves it to a `User` and stores it
//! in the request extensions, where the `AuthUser` extractor picks it up.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Arc<User>);

impl AuthUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<User>>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i32>().ok())
    else {
        warn!("missing or malformed {USER_ID_HEADER} header, request denied");
        return Err(AppError::Unauthorized);
    };

    let Some(user) = state.users.find_user(user_id).await? else {
        warn!("unknown user {user_id}, request denied");
        return Err(AppError::Unauthorized);
    };

    request.extensions_mut().insert(Arc::new(user));
    Ok(next.run(request).await)
}
