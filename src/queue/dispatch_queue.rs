use crate::models::payment::Payment;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// A webhook delivery unit of work: the event plus a snapshot of the payment
/// taken at transition time.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub event: String,
    pub payment: Payment,
}

pub fn create_queue(buffer: usize) -> (Sender<DispatchJob>, Receiver<DispatchJob>) {
    mpsc::channel(buffer)
}
