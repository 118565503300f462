use axum::http::{HeaderMap, StatusCode};
use pressroom_common::{Actor, UserId};

use crate::domain::AppState;
use crate::domain::repository::AccessResolver;
use crate::infrastructure::http::api::ApiError;

pub mod articles;

/// Header carrying the authenticated user's id. Session handling itself
/// is the surrounding application's concern.
pub const USER_ID_HEADER: &'static str = "x-user-id";

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Resolve the acting user once, up front; the transition rules then run
/// on the immutable capability set.
pub(crate) async fn resolve_actor<S: AppState>(
    state: &S,
    headers: &HeaderMap,
) -> Result<Actor, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::UnprocessableEntity("missing x-user-id header".to_string()))?;

    let user_id: i64 = raw
        .parse()
        .map_err(|_| ApiError::UnprocessableEntity("x-user-id must be an integer".to_string()))?;

    let actor = state.access().resolve(UserId(user_id)).await?;
    actor.ok_or_else(|| ApiError::Forbidden("unknown user".to_string()))
}
