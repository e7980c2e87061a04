pub mod payment;
pub mod rule;
pub mod webhook;
