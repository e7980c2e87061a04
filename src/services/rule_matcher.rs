use crate::app::error::ApiError;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::rule::{
    Condition, ConditionField, ConditionOp, CreateRuleRequest, RuleState, SimulationRule,
};
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory store of simulation rules, consumed read-only at evaluation time.
pub struct RuleStore {
    rules: DashMap<String, SimulationRule>,
    seq: AtomicU64,
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn create(&self, request: CreateRuleRequest) -> Result<SimulationRule, ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("rule name must not be empty".to_string()));
        }

        let rule = SimulationRule {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            status: request.status,
            conditions: request.conditions,
            assign_status: request.assign_status,
            priority: request.priority,
            created_at: Utc::now(),
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };

        info!(
            "Created rule {} ({}) priority {} -> {}",
            rule.id, rule.name, rule.priority, rule.assign_status
        );
        self.rules.insert(rule.id.clone(), rule.clone());
        Ok(rule)
    }

    /// All rules, priority descending, insertion order breaking ties.
    pub fn list(&self) -> Vec<SimulationRule> {
        let mut rules: Vec<SimulationRule> =
            self.rules.iter().map(|entry| entry.clone()).collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        rules
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.rules
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("rule {id} not found")))
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

/// First enabled rule (priority desc, ties by insertion order) whose
/// conditions all hold wins; its configured status is returned.
pub fn evaluate(rules: &[SimulationRule], payment: &Payment) -> Option<PaymentStatus> {
    for rule in rules {
        if rule.status != RuleState::Enabled {
            continue;
        }
        if rule.conditions.iter().all(|c| condition_holds(c, payment)) {
            debug!("Rule {} matched payment {}", rule.name, payment.id);
            return Some(rule.assign_status);
        }
    }
    None
}

fn condition_holds(condition: &Condition, payment: &Payment) -> bool {
    match condition.field {
        ConditionField::Amount => numeric_holds(condition.op, payment.amount, &condition.value),
        ConditionField::Currency => string_holds(condition.op, &payment.currency, &condition.value),
        ConditionField::PaymentMethod => {
            string_holds(condition.op, payment.payment_method.as_str(), &condition.value)
        }
        ConditionField::PayerEmail => {
            string_holds(condition.op, &payment.payer.email, &condition.value)
        }
        ConditionField::PayerName => {
            string_holds(condition.op, &payment.payer.name, &condition.value)
        }
    }
}

fn numeric_holds(op: ConditionOp, actual: f64, value: &Value) -> bool {
    let Some(expected) = value.as_f64() else {
        return false;
    };
    match op {
        ConditionOp::Eq => actual == expected,
        ConditionOp::Ne => actual != expected,
        ConditionOp::Gt => actual > expected,
        ConditionOp::Gte => actual >= expected,
        ConditionOp::Lt => actual < expected,
        ConditionOp::Lte => actual <= expected,
        // contains não se aplica a valores numéricos
        ConditionOp::Contains => false,
    }
}

fn string_holds(op: ConditionOp, actual: &str, value: &Value) -> bool {
    let Some(expected) = value.as_str() else {
        return false;
    };
    match op {
        ConditionOp::Eq => actual == expected,
        ConditionOp::Ne => actual != expected,
        ConditionOp::Contains => actual.contains(expected),
        _ => false,
    }
}
