use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use crate::app::error::ApiError;
use crate::app::router::AppState;
use crate::models::rule::{CreateRuleRequest, SimulationRule};

pub async fn create_rule(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<SimulationRule>), ApiError> {
    let request: CreateRuleRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::Validation(format!("invalid rule: {e}")))?;

    let rule = state.rules.create(request)?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<SimulationRule>> {
    Json(state.rules.list())
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.rules.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
