use crate::models::payment::PaymentStatus;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    Capture,
    Cancel,
    Refund,
    /// Simulator-only escape hatch: jump to any status, ignoring the table.
    Simulate(PaymentStatus),
}

impl TransitionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionAction::Capture => "capture",
            TransitionAction::Cancel => "cancel",
            TransitionAction::Refund => "refund",
            TransitionAction::Simulate(_) => "simulate",
        }
    }
}

#[derive(Debug, Error)]
#[error("cannot {action} a payment in status {from}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub from: PaymentStatus,
}

/// Applies an action to the current status, returning the new status or an
/// error when the action is illegal for the current state.
pub fn apply(action: TransitionAction, from: PaymentStatus) -> Result<PaymentStatus, InvalidTransition> {
    use PaymentStatus::*;

    match action {
        TransitionAction::Capture => match from {
            Pending | InProcess => Ok(Approved),
            _ => Err(InvalidTransition {
                action: action.as_str(),
                from,
            }),
        },
        TransitionAction::Cancel => match from {
            Cancelled | Refunded | ChargedBack => Err(InvalidTransition {
                action: action.as_str(),
                from,
            }),
            _ => Ok(Cancelled),
        },
        TransitionAction::Refund => match from {
            Approved => Ok(Refunded),
            _ => Err(InvalidTransition {
                action: action.as_str(),
                from,
            }),
        },
        TransitionAction::Simulate(target) => Ok(target),
    }
}
