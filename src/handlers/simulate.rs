use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::app::error::ApiError;
use crate::app::router::AppState;
use crate::models::payment::PaymentStatus;
use crate::services::transitions::TransitionAction;

#[derive(Deserialize)]
pub struct SimulateRequest {
    payment_id: String,
    status: String,
}

/// Forces a payment into an arbitrary status, bypassing the transition table.
pub async fn simulate_payment(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let request: SimulateRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::Validation(format!("invalid simulate request: {e}")))?;

    let target = PaymentStatus::parse(&request.status)
        .ok_or_else(|| ApiError::Validation(format!("unknown status: {}", request.status)))?;

    info!("Simulate requested: payment {} -> {}", request.payment_id, target);
    let (payment, old_status) = state
        .payments
        .apply_action(&request.payment_id, TransitionAction::Simulate(target))
        .await?;

    Ok(Json(serde_json::json!({
        "payment_id": payment.id,
        "old_status": old_status,
        "new_status": payment.status,
    })))
}
