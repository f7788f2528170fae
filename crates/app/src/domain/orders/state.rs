//! Checkout state machine.

use tracing::debug;

/// The states a checkout attempt moves through.
///
/// The happy path is a strict chain; `Failed` is reachable from every
/// non-terminal state. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Initiated,
    PriceLocked,
    StockReserved,
    OrderCreated,
    CartCleared,
    Completed,
    Failed,
}

impl CheckoutState {
    /// Log/storage tag for the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::PriceLocked => "price_locked",
            Self::StockReserved => "stock_reserved",
            Self::OrderCreated => "order_created",
            Self::CartCleared => "cart_cleared",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the attempt can move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if matches!(next, Self::Failed) {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Self::Initiated, Self::PriceLocked)
                | (Self::PriceLocked, Self::StockReserved)
                | (Self::StockReserved, Self::OrderCreated)
                | (Self::OrderCreated, Self::CartCleared)
                | (Self::CartCleared, Self::Completed)
        )
    }

    /// Terminal states accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Tracks one checkout attempt through the state chain, rejecting any
/// transition the machine does not allow.
#[derive(Debug)]
pub(crate) struct CheckoutProgress {
    state: CheckoutState,
}

impl CheckoutProgress {
    pub(crate) const fn new() -> Self {
        Self {
            state: CheckoutState::Initiated,
        }
    }

    pub(crate) const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Advance to `next`.
    ///
    /// An illegal transition is a logic error in the orchestrator, surfaced
    /// as an error rather than a panic so request handling can degrade to a
    /// 500.
    pub(crate) fn advance(&mut self, next: CheckoutState) -> Result<(), IllegalTransition> {
        if !self.state.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.state,
                to: next,
            });
        }

        debug!(from = self.state.as_str(), to = next.as_str(), "checkout transition");

        self.state = next;

        Ok(())
    }
}

/// A transition the state machine forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal checkout transition: {} -> {}", from.as_str(), to.as_str())]
pub struct IllegalTransition {
    pub from: CheckoutState,
    pub to: CheckoutState,
}
