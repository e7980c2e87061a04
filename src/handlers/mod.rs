pub mod payments;
pub mod rules;
pub mod simulate;
pub mod webhooks;
