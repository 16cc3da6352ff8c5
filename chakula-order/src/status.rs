use crate::OrderStatus;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid order transition from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    /// The forward actions an outlet owner may trigger from this state;
    /// rendered as the action buttons on the dashboard. Enforcement proper
    /// lives server-side.
    pub fn forward_actions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.forward_actions().contains(&next)
    }
}

pub fn ensure_forward(from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}
