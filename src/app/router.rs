use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{payments, rules, simulate, webhooks};
use crate::services::{PaymentService, RuleStore, WebhookService};

#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService>,
    pub rules: Arc<RuleStore>,
    pub webhooks: Arc<WebhookService>,
    pub default_list_limit: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/payments",
            post(payments::create_payment).get(payments::list_payments),
        )
        .route("/api/payments/:id", get(payments::get_payment))
        .route("/api/payments/:id/capture", post(payments::capture_payment))
        .route("/api/payments/:id/cancel", post(payments::cancel_payment))
        .route("/api/payments/:id/refund", post(payments::refund_payment))
        .route("/api/simulate", post(simulate::simulate_payment))
        .route("/api/rules", post(rules::create_rule).get(rules::list_rules))
        .route("/api/rules/:id", delete(rules::delete_rule))
        .route(
            "/api/webhooks",
            post(webhooks::register_webhook).get(webhooks::list_webhooks),
        )
        .route("/api/webhooks/:id", delete(webhooks::delete_webhook))
        .route("/api/webhook-logs", get(webhooks::list_webhook_logs))
        .with_state(state)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
