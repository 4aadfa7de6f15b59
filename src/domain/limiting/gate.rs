//! Ordering gate: whether the store currently accepts new orders.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Ordering gate state.
///
/// ```text
/// Accepting ──(limit reached)──► Blocked
///     ▲                              │
///     └──(rollover or reset)─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingState {
    #[default]
    Accepting,
    Blocked,
}

impl OrderingState {
    pub fn is_blocked(&self) -> bool {
        matches!(self, OrderingState::Blocked)
    }
}

impl StateMachine for OrderingState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderingState::*;
        matches!((self, target), (Accepting, Blocked) | (Blocked, Accepting))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderingState::*;
        match self {
            Accepting => vec![Blocked],
            Blocked => vec![Accepting],
        }
    }
}

impl fmt::Display for OrderingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingState::Accepting => write!(f, "accepting"),
            OrderingState::Blocked => write!(f, "blocked"),
        }
    }
}

/// Where an order is being created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOrigin {
    /// A customer checking out on the storefront.
    Storefront,
    /// A store operator creating the order from the back office.
    /// Never blocked.
    Admin,
}

/// The page a customer notice would be shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageContext {
    /// Back-office screen.
    pub is_admin: bool,
    /// Shop, product, cart or checkout page.
    pub is_store_page: bool,
}

impl PageContext {
    pub fn storefront() -> Self {
        Self {
            is_admin: false,
            is_store_page: true,
        }
    }

    pub fn shows_customer_notices(&self) -> bool {
        !self.is_admin && self.is_store_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_moves_between_accepting_and_blocked() {
        let blocked = OrderingState::Accepting.transition_to(OrderingState::Blocked).unwrap();
        assert!(blocked.is_blocked());

        let accepting = blocked.transition_to(OrderingState::Accepting).unwrap();
        assert_eq!(accepting, OrderingState::Accepting);
    }

    #[test]
    fn gate_rejects_self_transitions() {
        assert!(OrderingState::Blocked.transition_to(OrderingState::Blocked).is_err());
        assert!(!OrderingState::Accepting.is_terminal());
    }

    #[test]
    fn notices_only_show_on_storefront_store_pages() {
        assert!(PageContext::storefront().shows_customer_notices());
        assert!(!PageContext { is_admin: true, is_store_page: true }.shows_customer_notices());
        assert!(!PageContext::default().shows_customer_notices());
    }
}
