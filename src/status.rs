use serde::{Deserialize, Serialize};
use std::fmt;

/// Display text the tracker shows for a placed order
pub const PLACED_TEXT: &str = "Order Placed";
/// Display text the tracker shows while the kitchen works on the order
pub const PREPARING_TEXT: &str = "Preparing Your Order";
/// Display text the tracker shows once the order is delivered
pub const ARRIVED_TEXT: &str = "Order Arrived";

/// Semantic state of a tracked order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed with the restaurant
    Placed,
    /// Restaurant is preparing the order
    Preparing,
    /// Order has been delivered
    Arrived,
    /// Unrecognized label text, or no label could be read
    Unknown,
}

impl OrderStatus {
    /// Every state with a known label on the tracker page
    pub const KNOWN: [OrderStatus; 3] = [
        OrderStatus::Placed,
        OrderStatus::Preparing,
        OrderStatus::Arrived,
    ];

    /// The exact label the tracker shows for this state, if it has one
    pub fn display_text(self) -> Option<&'static str> {
        match self {
            OrderStatus::Placed => Some(PLACED_TEXT),
            OrderStatus::Preparing => Some(PREPARING_TEXT),
            OrderStatus::Arrived => Some(ARRIVED_TEXT),
            OrderStatus::Unknown => None,
        }
    }

    pub fn is_arrived(self) -> bool {
        matches!(self, OrderStatus::Arrived)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text().unwrap_or("Unknown"))
    }
}

/// Map raw label text to an order state.
///
/// Matching is exact and case-sensitive. Anything that is not one of the
/// three known labels, including the empty string, is `Unknown`.
pub fn classify(text: &str) -> OrderStatus {
    OrderStatus::KNOWN
        .into_iter()
        .find(|status| status.display_text() == Some(text))
        .unwrap_or(OrderStatus::Unknown)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;
