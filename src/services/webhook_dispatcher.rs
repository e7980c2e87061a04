use crate::app::config::Config;
use crate::models::webhook::{WebhookDeliveryLogEntry, WebhookPayload};
use crate::queue::dispatch_queue::DispatchJob;
use crate::services::webhook_service::WebhookService;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Delivers webhook jobs pulled off the dispatch queue. One POST per matching
/// registration (plus the payment's own notification_url), one log entry per
/// attempt regardless of outcome. Failed deliveries are not retried.
pub struct WebhookDispatcher {
    client: Client,
    webhooks: Arc<WebhookService>,
}

impl WebhookDispatcher {
    pub fn new(config: &Config, webhooks: Arc<WebhookService>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.webhook_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, webhooks }
    }

    pub async fn run(&self, mut receiver: mpsc::Receiver<DispatchJob>) {
        info!("Starting webhook dispatch worker");

        while let Some(job) = receiver.recv().await {
            self.dispatch(job).await;
        }

        info!("Webhook dispatch queue closed, worker exiting");
    }

    /// Resolves destinations for a job and delivers to each one.
    pub async fn dispatch(&self, job: DispatchJob) {
        let mut destinations: Vec<String> = self
            .webhooks
            .matching(&job.event)
            .into_iter()
            .map(|registration| registration.url)
            .collect();
        if let Some(url) = &job.payment.notification_url {
            destinations.push(url.clone());
        }

        if destinations.is_empty() {
            return;
        }

        let payload = WebhookPayload::from_payment(&job.event, &job.payment);
        for url in destinations {
            let entry = self.deliver(&job.event, &job.payment.id, &url, &payload).await;
            self.webhooks.log_delivery(entry);
        }
    }

    async fn deliver(
        &self,
        event: &str,
        payment_id: &str,
        url: &str,
        payload: &WebhookPayload,
    ) -> WebhookDeliveryLogEntry {
        let result = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await;

        let (http_status, success, error) = match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("Webhook {} delivered to {} ({})", event, url, status);
                    (Some(status.as_u16()), true, None)
                } else {
                    warn!("Webhook {} to {} returned {}", event, url, status);
                    (Some(status.as_u16()), false, Some(format!("HTTP {status}")))
                }
            }
            Err(e) => {
                error!("Webhook {} to {} failed: {}", event, url, e);
                (None, false, Some(e.to_string()))
            }
        };

        WebhookDeliveryLogEntry {
            id: Uuid::new_v4().to_string(),
            event: event.to_string(),
            payment_id: payment_id.to_string(),
            url: url.to_string(),
            http_status,
            success,
            error,
            sent_at: Utc::now(),
        }
    }
}
