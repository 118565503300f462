use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use crate::domain::AppState;
use crate::domain::article::ArticleId;
use crate::domain::article::state::ArticleState;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::articles::dto::{
    ArticleResponse, ScheduleRequest, ScheduleResponse,
};
use crate::infrastructure::http::handlers::resolve_actor;

mod dto;

pub async fn article_detail<S: AppState>(
    Path(id): Path<i64>,
    State(state): State<S>,
) -> Result<ApiSuccess<ArticleResponse>, ApiError> {
    let article = state
        .publications()
        .find_article(ArticleId(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(ApiSuccess::new(StatusCode::OK, ArticleResponse::from(article)))
}

/// One endpoint per target state, mirroring the interactive actions:
/// `POST /api/articles/{id}/state/{target}`.
pub async fn change_article_state<S: AppState>(
    Path((id, target)): Path<(i64, String)>,
    State(state): State<S>,
    headers: HeaderMap,
) -> Result<ApiSuccess<ArticleResponse>, ApiError> {
    let target = ArticleState::from_code(&target)
        .ok_or_else(|| ApiError::UnprocessableEntity(format!("unknown state {:?}", target)))?;

    let actor = resolve_actor(&state, &headers).await?;

    let article = state
        .publications()
        .change_state(ArticleId(id), target, &actor)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, ArticleResponse::from(article)))
}

pub async fn schedule_publication<S: AppState>(
    Path(id): Path<i64>,
    State(state): State<S>,
    headers: HeaderMap,
    Json(body): Json<ScheduleRequest>,
) -> Result<ApiSuccess<ScheduleResponse>, ApiError> {
    let actor = resolve_actor(&state, &headers).await?;

    let schedule = state
        .scheduler()
        .schedule(ArticleId(id), body.publish_at, &actor)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        ScheduleResponse::from(schedule),
    ))
}
