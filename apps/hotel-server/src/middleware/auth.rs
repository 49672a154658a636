//! Authentication middleware.

use std::sync::Arc;

use entities::User;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hotel_store::{Repository, Store};
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Identity of the user making a request.
///
/// Every service operation that depends on who is asking takes a `Caller`
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Whether the user has administrator rights.
    pub is_admin: bool,
}

impl Caller {
    /// Returns true if the caller may act on records owned by `owner`.
    pub fn can_access(&self, owner: Uuid) -> bool {
        self.is_admin || self.id == owner
    }

    /// Fails unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ServerError::PermissionDenied)
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or(ServerError::AuthenticationRequired)
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Validates a JWT token and loads the user it names.
///
/// Rights come from the stored user, not from the token, so a demoted or
/// deleted user loses access on their next request.
async fn authenticate<S: Store>(state: &AppState<S>, token: &str) -> Result<Caller, ServerError> {
    let user_id = state
        .jwt_manager
        .validate_token(token)
        .and_then(|claims| claims.user_id())
        .map_err(|_| ServerError::InvalidToken)?;

    match state.store.users().get_by_id(user_id).await? {
        Some(user) => Ok(Caller::from(&user)),
        None => {
            tracing::debug!(user_id = %user_id, "Token names an unknown user");
            Err(ServerError::InvalidToken)
        }
    }
}

/// Optional authentication middleware.
///
/// Requests without a token pass through anonymously, and handlers that need
/// a caller reject them via the [`Caller`] extractor. A token that is present
/// but invalid is rejected here.
pub async fn optional_auth_middleware<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&request).map(str::to_owned) {
        match authenticate(&state, &token).await {
            Ok(caller) => {
                request.extensions_mut().insert(caller);
            }
            Err(e) => return e.into_response(),
        }
    }

    next.run(request).await
}
