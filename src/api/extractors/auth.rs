use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::Span;

use crate::domain::models::user::{ROLE_CLIENT, ROLE_OWNER, ROLE_STAFF};
use crate::error::AppError;

/// Identity asserted by the upstream gateway. Authentication happens there;
/// this service only reads the forwarded claims.
pub struct AuthUser {
    pub user_id: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_operator(&self) -> bool {
        self.role == ROLE_STAFF || self.role == ROLE_OWNER
    }

    pub fn require_operator(&self) -> Result<(), AppError> {
        if self.is_operator() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Staff or owner role required".to_string()))
        }
    }

    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.role == ROLE_OWNER {
            Ok(())
        } else {
            Err(AppError::Forbidden("Owner role required".to_string()))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_string();

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_string();

        if role != ROLE_CLIENT && role != ROLE_STAFF && role != ROLE_OWNER {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Span::current().record("user_id", &user_id);

        Ok(AuthUser { user_id, role })
    }
}
