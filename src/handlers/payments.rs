use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::app::error::ApiError;
use crate::app::router::AppState;
use crate::models::payment::{CreatePaymentRequest, Payment, PaymentStatus};
use crate::services::transitions::TransitionAction;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let request: CreatePaymentRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::Validation(format!("invalid payment request: {e}")))?;

    let payment = state.payments.create(request)?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[derive(Deserialize)]
pub struct ListPaymentsQuery {
    status: Option<String>,
    limit: Option<usize>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => Some(
            PaymentStatus::parse(s)
                .ok_or_else(|| ApiError::Validation(format!("unknown status filter: {s}")))?,
        ),
        None => None,
    };
    let limit = query.limit.unwrap_or(state.default_list_limit);

    Ok(Json(state.payments.list(status, limit)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.get(&id)?))
}

pub async fn capture_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    info!("Capture requested for payment {}", id);
    let (payment, _) = state.payments.apply_action(&id, TransitionAction::Capture).await?;
    Ok(Json(payment))
}

pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    info!("Cancel requested for payment {}", id);
    let (payment, _) = state.payments.apply_action(&id, TransitionAction::Cancel).await?;
    Ok(Json(payment))
}

pub async fn refund_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    info!("Refund requested for payment {}", id);
    let (payment, _) = state.payments.apply_action(&id, TransitionAction::Refund).await?;
    Ok(Json(payment))
}
