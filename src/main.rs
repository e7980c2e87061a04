mod app;
mod handlers;
mod models;
mod queue;
mod services;
mod utils;

use app::config::Config;
use app::router::{build_router, AppState};
use queue::dispatch_queue;
use services::{PaymentService, RuleStore, WebhookDispatcher, WebhookService};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    info!("Starting payment simulator on port {}", config.server_port);

    let rules = Arc::new(RuleStore::new());
    let webhooks = Arc::new(WebhookService::new());
    let (dispatch_sender, dispatch_receiver) = dispatch_queue::create_queue(config.queue_buffer_size);
    let payments = Arc::new(PaymentService::new(rules.clone(), dispatch_sender));
    let dispatcher = Arc::new(WebhookDispatcher::new(&config, webhooks.clone()));

    // Webhook delivery runs off the request path; API responses never wait
    // for destination endpoints.
    tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move {
            dispatcher.run(dispatch_receiver).await;
        }
    });

    let state = AppState {
        payments,
        rules,
        webhooks,
        default_list_limit: config.default_list_limit,
    };
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}
