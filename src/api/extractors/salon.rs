use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Span;

use crate::state::AppState;

/// Resolves the `{salon_id}` path segment and verifies the salon exists.
pub struct SalonId(pub String);

impl FromRequestParts<Arc<AppState>> for SalonId {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let salon_id = params.get("salon_id").ok_or(StatusCode::BAD_REQUEST)?;

        match state.salon_repo.find_by_id(salon_id).await {
            Ok(Some(_)) => {
                Span::current().record("salon_id", salon_id);
                Ok(SalonId(salon_id.clone()))
            }
            Ok(None) => Err(StatusCode::NOT_FOUND),
            Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
