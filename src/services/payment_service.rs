use crate::app::error::ApiError;
use crate::models::payment::{CreatePaymentRequest, Payment, PaymentStatus};
use crate::queue::dispatch_queue::DispatchJob;
use crate::services::rule_matcher::{self, RuleStore};
use crate::services::transitions::{self, TransitionAction};
use crate::utils::money;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

pub struct PaymentService {
    storage: DashMap<String, Payment>,
    seq: AtomicU64,
    rules: Arc<RuleStore>,
    dispatch_sender: mpsc::Sender<DispatchJob>,
}

impl PaymentService {
    pub fn new(rules: Arc<RuleStore>, dispatch_sender: mpsc::Sender<DispatchJob>) -> Self {
        Self {
            storage: DashMap::new(),
            seq: AtomicU64::new(0),
            rules,
            dispatch_sender,
        }
    }

    /// Creates a payment. Initial status precedence: explicit
    /// `_simulate_status` override, then first matching rule, then pending.
    pub fn create(&self, request: CreatePaymentRequest) -> Result<Payment, ApiError> {
        if !money::is_valid_amount(request.amount) {
            return Err(ApiError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }
        let currency = normalize_currency(request.currency)?;
        if let Some(installments) = request.installments {
            if installments == 0 {
                return Err(ApiError::Validation(
                    "installments must be at least 1".to_string(),
                ));
            }
        }
        if let Some(url) = &request.notification_url {
            Url::parse(url)
                .map_err(|e| ApiError::Validation(format!("invalid notification_url: {e}")))?;
        }

        let mut payment = Payment {
            id: Uuid::new_v4().to_string(),
            amount: money::round_to_cents(request.amount),
            currency,
            payment_method: request.payment_method,
            status: PaymentStatus::Pending,
            payer: request.payer,
            card: request.card,
            description: request.description,
            installments: request.installments,
            notification_url: request.notification_url,
            created_at: Utc::now(),
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };

        payment.status = match request.simulate_status {
            Some(forced) => {
                info!("Payment {} status forced to {} at creation", payment.id, forced);
                forced
            }
            None => rule_matcher::evaluate(&self.rules.list(), &payment)
                .unwrap_or(PaymentStatus::Pending),
        };

        info!(
            "Created payment {} {} {} via {} -> {}",
            payment.id, payment.amount, payment.currency, payment.payment_method.as_str(), payment.status
        );
        self.storage.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    pub fn get(&self, id: &str) -> Result<Payment, ApiError> {
        self.storage
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))
    }

    /// Payments newest-first, optionally filtered by status.
    pub fn list(&self, status: Option<PaymentStatus>, limit: usize) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .storage
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .map(|entry| entry.clone())
            .collect();
        payments.sort_by(|a, b| b.seq.cmp(&a.seq));
        payments.truncate(limit);
        payments
    }

    /// Runs an action through the transition table, persists the new status
    /// and enqueues a webhook dispatch. Returns the updated payment and the
    /// status it transitioned from. On an illegal action the payment is left
    /// untouched.
    pub async fn apply_action(
        &self,
        id: &str,
        action: TransitionAction,
    ) -> Result<(Payment, PaymentStatus), ApiError> {
        let snapshot = {
            // get_mut serializes concurrent transitions on the same id
            let mut entry = self
                .storage
                .get_mut(id)
                .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
            let old_status = entry.status;
            let new_status = transitions::apply(action, old_status)?;
            entry.status = new_status;
            info!(
                "Payment {} {}: {} -> {}",
                id,
                action.as_str(),
                old_status,
                new_status
            );
            (entry.clone(), old_status)
        };

        let job = DispatchJob {
            event: snapshot.0.status.event_name(),
            payment: snapshot.0.clone(),
        };
        if self.dispatch_sender.send(job).await.is_err() {
            warn!("Dispatch queue closed, webhook for payment {} dropped", id);
        }

        Ok(snapshot)
    }
}

fn normalize_currency(currency: Option<String>) -> Result<String, ApiError> {
    let currency = match currency {
        Some(c) => c,
        None => return Ok("BRL".to_string()),
    };
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::Validation(format!(
            "invalid currency code: {currency}"
        )));
    }
    Ok(currency.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{Payer, PaymentMethod};
    use crate::models::rule::{Condition, ConditionField, ConditionOp, CreateRuleRequest, RuleState};
    use crate::queue::dispatch_queue;
    use serde_json::json;
    use tokio::sync::mpsc::Receiver;

    fn service() -> (PaymentService, Receiver<DispatchJob>, Arc<RuleStore>) {
        let rules = Arc::new(RuleStore::new());
        let (sender, receiver) = dispatch_queue::create_queue(16);
        (PaymentService::new(rules.clone(), sender), receiver, rules)
    }

    fn create_request(amount: f64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount,
            currency: None,
            payment_method: PaymentMethod::CreditCard,
            card: None,
            payer: Payer {
                name: "Maria Silva".to_string(),
                email: "maria@example.com".to_string(),
            },
            description: None,
            installments: None,
            notification_url: None,
            simulate_status: None,
        }
    }

    #[test]
    fn test_create_defaults_to_pending_and_brl() {
        let (service, _rx, _) = service();
        let payment = service.create(create_request(100.0)).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.currency, "BRL");
        assert_eq!(payment.amount, 100.0);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (service, _rx, _) = service();

        assert!(matches!(
            service.create(create_request(0.0)),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            service.create(create_request(-5.0)),
            Err(ApiError::Validation(_))
        ));

        let mut bad_currency = create_request(10.0);
        bad_currency.currency = Some("REAIS".to_string());
        assert!(matches!(
            service.create(bad_currency),
            Err(ApiError::Validation(_))
        ));

        let mut zero_installments = create_request(10.0);
        zero_installments.installments = Some(0);
        assert!(matches!(
            service.create(zero_installments),
            Err(ApiError::Validation(_))
        ));

        let mut bad_url = create_request(10.0);
        bad_url.notification_url = Some("not-a-url".to_string());
        assert!(matches!(
            service.create(bad_url),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_create_applies_matching_rule() {
        let (service, _rx, rules) = service();
        rules
            .create(CreateRuleRequest {
                name: "auto reject big amounts".to_string(),
                status: RuleState::Enabled,
                conditions: vec![Condition {
                    field: ConditionField::Amount,
                    op: ConditionOp::Gt,
                    value: json!(500),
                }],
                assign_status: PaymentStatus::Rejected,
                priority: 1,
            })
            .unwrap();

        let rejected = service.create(create_request(1000.0)).unwrap();
        assert_eq!(rejected.status, PaymentStatus::Rejected);

        let untouched = service.create(create_request(100.0)).unwrap();
        assert_eq!(untouched.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_override_bypasses_rules() {
        let (service, _rx, rules) = service();
        rules
            .create(CreateRuleRequest {
                name: "reject everything".to_string(),
                status: RuleState::Enabled,
                conditions: vec![],
                assign_status: PaymentStatus::Rejected,
                priority: 100,
            })
            .unwrap();

        let mut request = create_request(100.0);
        request.simulate_status = Some(PaymentStatus::Approved);
        let payment = service.create(request).unwrap();
        assert_eq!(payment.status, PaymentStatus::Approved);
    }

    #[test]
    fn test_list_newest_first_with_filter() {
        let (service, _rx, _) = service();
        let first = service.create(create_request(1.0)).unwrap();
        let second = service.create(create_request(2.0)).unwrap();
        let mut forced = create_request(3.0);
        forced.simulate_status = Some(PaymentStatus::Approved);
        let third = service.create(forced).unwrap();

        let all = service.list(None, 10);
        assert_eq!(
            all.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]
        );

        let pending = service.list(Some(PaymentStatus::Pending), 10);
        assert_eq!(pending.len(), 2);

        let limited = service.list(None, 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, third.id);
    }

    #[tokio::test]
    async fn test_capture_then_refund_lifecycle() {
        let (service, mut rx, _) = service();
        let payment = service.create(create_request(100.0)).unwrap();

        let (captured, old) = service
            .apply_action(&payment.id, TransitionAction::Capture)
            .await
            .unwrap();
        assert_eq!(old, PaymentStatus::Pending);
        assert_eq!(captured.status, PaymentStatus::Approved);
        assert_eq!(rx.try_recv().unwrap().event, "payment.approved");

        let (refunded, _) = service
            .apply_action(&payment.id, TransitionAction::Refund)
            .await
            .unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        assert_eq!(rx.try_recv().unwrap().event, "payment.refunded");

        // capture after refund is illegal and must leave the status alone
        let err = service
            .apply_action(&payment.id, TransitionAction::Capture)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
        assert_eq!(
            service.get(&payment.id).unwrap().status,
            PaymentStatus::Refunded
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refund_requires_approved() {
        let (service, mut rx, _) = service();
        let payment = service.create(create_request(100.0)).unwrap();

        let err = service
            .apply_action(&payment.id, TransitionAction::Refund)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
        assert_eq!(
            service.get(&payment.id).unwrap().status,
            PaymentStatus::Pending
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_simulate_jumps_anywhere() {
        let (service, mut rx, _) = service();
        let payment = service.create(create_request(100.0)).unwrap();

        let (updated, old) = service
            .apply_action(
                &payment.id,
                TransitionAction::Simulate(PaymentStatus::ChargedBack),
            )
            .await
            .unwrap();
        assert_eq!(old, PaymentStatus::Pending);
        assert_eq!(updated.status, PaymentStatus::ChargedBack);
        assert_eq!(rx.try_recv().unwrap().event, "payment.charged_back");
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let (service, _rx, _) = service();
        assert!(matches!(
            service.get("missing"),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            service
                .apply_action("missing", TransitionAction::Capture)
                .await,
            Err(ApiError::NotFound(_))
        ));
    }
}
