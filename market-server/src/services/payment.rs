//! Payment link stub
//!
//! Settlement is handled by the external payment provider; this core only
//! hands out an opaque checkout URL. There is no callback/webhook path.

use uuid::Uuid;

/// Base URL of the hosted checkout (provider-side)
const CHECKOUT_BASE: &str = "https://pay.example.com/checkout";

/// Build an opaque checkout link for an order.
pub fn payment_link(order_id: i64, method: &str, amount_cents: i64) -> String {
    let reference = Uuid::new_v4();
    format!("{CHECKOUT_BASE}/{reference}?order={order_id}&method={method}&amount={amount_cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_opaque_and_distinct() {
        let a = payment_link(1, "card", 500);
        let b = payment_link(1, "card", 500);
        assert!(a.starts_with(CHECKOUT_BASE));
        assert_ne!(a, b);
    }
}
