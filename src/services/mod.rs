pub mod payment_service;
pub mod rule_matcher;
pub mod transitions;
pub mod webhook_dispatcher;
pub mod webhook_service;

pub use payment_service::PaymentService;
pub use rule_matcher::RuleStore;
pub use webhook_dispatcher::WebhookDispatcher;
pub use webhook_service::WebhookService;
