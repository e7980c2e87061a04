use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    InProcess,
    Approved,
    Rejected,
    Error,
    Cancelled,
    Refunded,
    ChargedBack,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::InProcess => "in_process",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Error => "error",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::ChargedBack => "charged_back",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "in_process" => Some(PaymentStatus::InProcess),
            "approved" => Some(PaymentStatus::Approved),
            "rejected" => Some(PaymentStatus::Rejected),
            "error" => Some(PaymentStatus::Error),
            "cancelled" => Some(PaymentStatus::Cancelled),
            "refunded" => Some(PaymentStatus::Refunded),
            "charged_back" => Some(PaymentStatus::ChargedBack),
            _ => None,
        }
    }

    /// Event name fired on a transition into this status, e.g. "payment.approved".
    pub fn event_name(&self) -> String {
        format!("payment.{}", self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, PaymentMethod::CreditCard | PaymentMethod::DebitCard)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    pub email: String,
}

// Dados mascarados do cartão; nunca validados contra um processador real.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInfo {
    pub last_four: String,
    pub holder_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub payer: Payer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,
    pub created_at: DateTime<Utc>,
    // Monotonic creation sequence, used for newest-first ordering.
    #[serde(skip)]
    pub seq: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: f64,
    pub currency: Option<String>,
    pub payment_method: PaymentMethod,
    pub card: Option<CardInfo>,
    pub payer: Payer,
    pub description: Option<String>,
    pub installments: Option<u32>,
    pub notification_url: Option<String>,
    /// Explicit status override; bypasses rule evaluation entirely.
    #[serde(rename = "_simulate_status")]
    pub simulate_status: Option<PaymentStatus>,
}
