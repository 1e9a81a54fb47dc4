//! Checkout command.
//!
//! Drives the full wizard over the persisted cart in one invocation:
//! shipping details, payment method, confirmation, and the remote order
//! submission. On success it prints the order id and the pre-filled
//! WhatsApp notification link; on a backend failure it prints a manual
//! fallback link so the order is not lost.
//!
//! # Usage
//!
//! ```bash
//! sm-cli checkout --name "Ali Raza" --email you@example.com \
//!     --phone 03001234567 --address "House 12, Street 4" --city Lahore \
//!     --payment cod --transaction-id TXN-123 --agree-terms
//! ```

use clap::Args;
use synergy_core::PaymentMethod;
use synergy_storefront::checkout::ShippingForm;
use synergy_storefront::shop::SubmitError;

use super::open_shop_online;

/// Everything the wizard collects, as flags.
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Recipient full name
    #[arg(long = "name")]
    pub full_name: String,

    /// Contact email address
    #[arg(long)]
    pub email: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Street address
    #[arg(long)]
    pub address: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// Postal code (optional)
    #[arg(long, default_value = "")]
    pub postal_code: String,

    /// Payment method: `cod`, `card`, `bank_transfer`, `mobile_wallet`
    #[arg(long, default_value = "cod")]
    pub payment: PaymentMethod,

    /// Advance-payment transaction reference (required for `cod`)
    #[arg(long)]
    pub transaction_id: Option<String>,

    /// Agree to the terms and conditions
    #[arg(long)]
    pub agree_terms: bool,
}

/// Run the wizard end to end and submit the order.
///
/// # Errors
///
/// Returns an error when a wizard guard fails (empty cart, not signed in,
/// missing fields) or the backend rejects the order.
pub async fn run(args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop_online().await?;

    shop.begin_checkout()?;
    shop.set_shipping(ShippingForm {
        full_name: args.full_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        postal_code: args.postal_code,
    })?;
    shop.continue_to_payment()?;

    shop.set_payment_method(args.payment)?;
    if let Some(transaction_id) = args.transaction_id {
        shop.set_transaction_id(transaction_id)?;
    }
    shop.continue_to_confirmation()?;

    shop.set_agreed_to_terms(args.agree_terms)?;

    println!(
        "Submitting order: {} item(s), {} + {} shipping",
        shop.cart().item_count(),
        shop.cart().subtotal(),
        shop.config().shipping_price
    );

    match shop.submit_order().await {
        Ok(confirmation) => {
            println!("Order placed: {}", confirmation.order_id);
            println!("Notify the order desk: {}", confirmation.whatsapp_link);
            Ok(())
        }
        Err(SubmitError::Remote {
            message,
            fallback_link,
        }) => {
            // The failure itself is reported once, through the returned error
            eprintln!("Send the order manually: {fallback_link}");
            Err(message.into())
        }
        Err(e @ SubmitError::Checkout(_)) => Err(e.into()),
    }
}
