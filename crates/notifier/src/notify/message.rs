//! Order confirmation message bodies.

use dialout_core::Price;

/// Build the body sent to every recipient of an order-placed notification.
///
/// Two lines: the order's display number, then its formatted total. All
/// three recipients (account, listing, guest) receive the identical text.
#[must_use]
pub fn order_placed_body(order_number: &str, total: &Price) -> String {
    format!(
        "Order #{order_number} has been placed.\nTotal: {}",
        total.display()
    )
}
