//! WhatsApp deep-link composition.
//!
//! The order desk is notified over WhatsApp with a pre-filled message. This
//! is a human-facing notification channel only — the order-of-record is the
//! backend submission, and links are composed strictly after the submission
//! outcome is known (confirmed order or explicit manual fallback).
//!
//! Links are built entirely client-side and never round-tripped to the
//! backend: `https://wa.me/<number>?text=<url-encoded summary>`.

use synergy_core::{OrderId, Price};

use crate::cart::CartLine;

/// Human-readable order summary in WhatsApp markup (`*bold*`).
///
/// Lists each cart line with its line total, then the grand total including
/// the flat shipping rate. When the backend already accepted the order its
/// id is included so the order desk can reconcile the two channels.
#[must_use]
pub fn order_message(
    lines: &[CartLine],
    subtotal: Price,
    shipping: Price,
    order_id: Option<&OrderId>,
) -> String {
    let mut message = String::from("*New Order Request*\n\n");

    if let Some(id) = order_id {
        message.push_str(&format!("*Order ID:* {id}\n\n"));
    }

    message.push_str("*Order Details:*\n");
    for line in lines {
        message.push_str(&format!(
            "- {} x {}: PKR {}\n",
            line.name,
            line.quantity,
            line.line_total().grouped()
        ));
    }

    message.push_str(&format!(
        "\n*Total Amount:* PKR {}\n",
        (subtotal + shipping).grouped()
    ));
    message.push_str(&format!("(Shipping included: PKR {})\n\n", shipping.grouped()));
    message.push_str("I would like to place this order. Please confirm availability and delivery details.");

    message
}

/// Deep-link that opens WhatsApp with `message` pre-filled for `number`
/// (international format, no `+`).
#[must_use]
pub fn deep_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use synergy_core::ProductId;

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                product_id: ProductId::new("A"),
                name: "Galaxy S24".to_string(),
                unit_price: Price::new(1000),
                quantity: 2,
                image: String::new(),
            },
            CartLine {
                product_id: ProductId::new("B"),
                name: "Redmi Note".to_string(),
                unit_price: Price::new(500),
                quantity: 1,
                image: String::new(),
            },
        ]
    }

    #[test]
    fn test_message_lists_lines_and_total() {
        let message = order_message(&lines(), Price::new(2500), Price::new(200), None);

        assert!(message.starts_with("*New Order Request*"));
        assert!(message.contains("- Galaxy S24 x 2: PKR 2,000\n"));
        assert!(message.contains("- Redmi Note x 1: PKR 500\n"));
        assert!(message.contains("*Total Amount:* PKR 2,700\n"));
        assert!(message.contains("(Shipping included: PKR 200)"));
        assert!(!message.contains("*Order ID:*"));
    }

    #[test]
    fn test_message_includes_order_id_when_confirmed() {
        let id = OrderId::new("665f1c2e9b1d");
        let message = order_message(&lines(), Price::new(2500), Price::new(200), Some(&id));
        assert!(message.contains("*Order ID:* 665f1c2e9b1d"));
    }

    #[test]
    fn test_deep_link_encodes_message() {
        let link = deep_link("923009786786", "*New Order Request*\n\nhello");

        assert!(link.starts_with("https://wa.me/923009786786?text="));
        assert!(link.contains("%2ANew%20Order%20Request%2A%0A%0Ahello"));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }
}
