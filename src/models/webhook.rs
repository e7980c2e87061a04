use crate::models::payment::{Payer, Payment, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct WebhookRegistration {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Event names this endpoint receives, or "*" for everything.
    pub events: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub seq: u64,
}

impl WebhookRegistration {
    pub fn matches(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == "*" || e == event)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterWebhookRequest {
    pub url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

/// One delivery attempt. Append-only, never mutated after being written.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookDeliveryLogEntry {
    pub id: String,
    pub event: String,
    pub payment_id: String,
    pub url: String,
    pub http_status: Option<u16>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
}

// Corpo enviado para cada webhook registrado.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub event: String,
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payer: Payer,
    pub created_at: DateTime<Utc>,
}

impl WebhookPayload {
    pub fn from_payment(event: &str, payment: &Payment) -> Self {
        Self {
            event: event.to_string(),
            payment_id: payment.id.clone(),
            status: payment.status,
            amount: payment.amount,
            currency: payment.currency.clone(),
            payment_method: payment.payment_method,
            payer: payment.payer.clone(),
            created_at: payment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn registration(events: &[&str]) -> WebhookRegistration {
        WebhookRegistration {
            id: "wh_1".to_string(),
            url: "http://localhost:9000/hook".to_string(),
            description: None,
            events: events.iter().map(|e| e.to_string()).collect(),
            created_at: Utc::now(),
            seq: 1,
        }
    }

    #[test]
    fn test_matches_exact_event() {
        let reg = registration(&["payment.approved"]);
        assert!(reg.matches("payment.approved"));
        assert!(!reg.matches("payment.cancelled"));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let reg = registration(&["*"]);
        assert!(reg.matches("payment.approved"));
        assert!(reg.matches("payment.refunded"));
    }
}
