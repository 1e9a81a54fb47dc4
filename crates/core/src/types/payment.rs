//! Payment method selection.

use serde::{Deserialize, Serialize};

/// How the shopper intends to pay for an order.
///
/// Cash-on-delivery is the default and requires a small advance payment;
/// the checkout flow collects the advance-payment transaction reference
/// before an order can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Card,
    BankTransfer,
    MobileWallet,
}

impl PaymentMethod {
    /// Whether this method requires an advance-payment transaction reference.
    #[must_use]
    pub const fn requires_transaction_id(self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CashOnDelivery => write!(f, "Cash on Delivery"),
            Self::Card => write!(f, "Card"),
            Self::BankTransfer => write!(f, "Bank Transfer"),
            Self::MobileWallet => write!(f, "Mobile Wallet"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_on_delivery" | "cod" => Ok(Self::CashOnDelivery),
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "mobile_wallet" => Ok(Self::MobileWallet),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cash_on_delivery() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_transaction_id_requirement() {
        assert!(PaymentMethod::CashOnDelivery.requires_transaction_id());
        assert!(!PaymentMethod::Card.requires_transaction_id());
        assert!(!PaymentMethod::BankTransfer.requires_transaction_id());
        assert!(!PaymentMethod::MobileWallet.requires_transaction_id());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "cod".parse::<PaymentMethod>(),
            Ok(PaymentMethod::CashOnDelivery)
        );
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>(),
            Ok(PaymentMethod::BankTransfer)
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
