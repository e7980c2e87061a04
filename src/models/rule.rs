use crate::models::payment::PaymentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleState {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    Amount,
    Currency,
    PaymentMethod,
    PayerEmail,
    PayerName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

/// One predicate of a rule: `field op value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: ConditionField,
    pub op: ConditionOp,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationRule {
    pub id: String,
    pub name: String,
    pub status: RuleState,
    pub conditions: Vec<Condition>,
    /// Status assigned to a payment when this rule matches.
    pub assign_status: PaymentStatus,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    // Insertion order, breaks priority ties (first created wins).
    #[serde(skip)]
    pub seq: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub status: RuleState,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub assign_status: PaymentStatus,
    #[serde(default)]
    pub priority: i64,
}
