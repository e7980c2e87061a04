use crate::app::error::ApiError;
use crate::models::webhook::{
    RegisterWebhookRequest, WebhookDeliveryLogEntry, WebhookRegistration,
};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Webhook registry plus the append-only delivery log.
pub struct WebhookService {
    registrations: DashMap<String, WebhookRegistration>,
    logs: RwLock<Vec<WebhookDeliveryLogEntry>>,
    seq: AtomicU64,
}

impl WebhookService {
    pub fn new() -> Self {
        Self {
            registrations: DashMap::new(),
            logs: RwLock::new(Vec::new()),
            seq: AtomicU64::new(0),
        }
    }

    pub fn register(&self, request: RegisterWebhookRequest) -> Result<WebhookRegistration, ApiError> {
        let parsed = Url::parse(&request.url)
            .map_err(|e| ApiError::Validation(format!("invalid webhook url: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::Validation(format!(
                "unsupported webhook url scheme: {}",
                parsed.scheme()
            )));
        }

        let events = if request.events.is_empty() {
            vec!["*".to_string()]
        } else {
            request.events
        };

        let registration = WebhookRegistration {
            id: Uuid::new_v4().to_string(),
            url: request.url,
            description: request.description,
            events,
            created_at: Utc::now(),
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };

        info!(
            "Registered webhook {} -> {} ({:?})",
            registration.id, registration.url, registration.events
        );
        self.registrations
            .insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    pub fn list(&self) -> Vec<WebhookRegistration> {
        let mut registrations: Vec<WebhookRegistration> =
            self.registrations.iter().map(|entry| entry.clone()).collect();
        registrations.sort_by_key(|r| r.seq);
        registrations
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.registrations
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("webhook {id} not found")))
    }

    /// Registrations subscribed to this event, in registration order.
    pub fn matching(&self, event: &str) -> Vec<WebhookRegistration> {
        let mut matching: Vec<WebhookRegistration> = self
            .registrations
            .iter()
            .filter(|entry| entry.matches(event))
            .map(|entry| entry.clone())
            .collect();
        matching.sort_by_key(|r| r.seq);
        matching
    }

    pub fn log_delivery(&self, entry: WebhookDeliveryLogEntry) {
        self.logs.write().unwrap().push(entry);
    }

    pub fn list_logs(&self, limit: usize) -> Vec<WebhookDeliveryLogEntry> {
        let logs = self.logs.read().unwrap();
        logs.iter().rev().take(limit).cloned().collect()
    }

    #[cfg(test)]
    pub fn log_count(&self) -> usize {
        self.logs.read().unwrap().len()
    }
}

impl Default for WebhookService {
    fn default() -> Self {
        Self::new()
    }
}
