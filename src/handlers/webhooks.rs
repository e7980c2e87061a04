use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::error::ApiError;
use crate::app::router::AppState;
use crate::models::webhook::{
    RegisterWebhookRequest, WebhookDeliveryLogEntry, WebhookRegistration,
};

pub async fn register_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<WebhookRegistration>), ApiError> {
    let request: RegisterWebhookRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::Validation(format!("invalid webhook registration: {e}")))?;

    let registration = state.webhooks.register(request)?;
    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn list_webhooks(State(state): State<AppState>) -> Json<Vec<WebhookRegistration>> {
    Json(state.webhooks.list())
}

pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.webhooks.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct LogsQuery {
    limit: Option<usize>,
}

pub async fn list_webhook_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Json<Vec<WebhookDeliveryLogEntry>> {
    let limit = query.limit.unwrap_or(state.default_list_limit);
    Json(state.webhooks.list_logs(limit))
}
