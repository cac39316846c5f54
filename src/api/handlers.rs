use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{BatchReport, UserId, UserRecommendations},
    services::signals::Capabilities,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Signals that loaded at startup
pub async fn capabilities(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.engine.capabilities())
}

/// Re-ranked recommendations for one user
pub async fn recommend_for_user(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<UserRecommendations>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        "Processing recommendation request"
    );

    let recommendations = state.engine.recommend_for_user(user_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        items = ?recommendations.item_ids(),
        "Recommendation completed"
    );

    Ok(Json(recommendations))
}

/// Re-ranked recommendations for every known user
pub async fn recommend_for_all_users(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<BatchReport>> {
    tracing::info!(
        request_id = %request_id,
        users = state.engine.user_ids().len(),
        "Processing batch recommendation request"
    );

    let report = state.engine.clone().recommend_for_all_users().await?;

    Ok(Json(report))
}
