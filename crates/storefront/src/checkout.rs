//! Checkout wizard state machine.
//!
//! A checkout session walks `Shipping → Payment → Confirmation → Success`.
//! Back-navigation is allowed from Payment and Confirmation; nothing leaves
//! Success. Every forward transition is guarded, and a failed guard returns
//! an error naming what is missing while leaving the session untouched.
//!
//! The final `Confirmation → Success` transition is split in two: callers
//! check [`CheckoutSession::ready_to_submit`], perform the remote order
//! submission, and only then call [`CheckoutSession::complete`] with the
//! order id the backend returned. The session never claims success for an
//! order the backend has not accepted.

use synergy_core::{Email, EmailError, OrderId, PaymentMethod};
use thiserror::Error;

/// Wizard steps in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Shipping,
    Payment,
    Confirmation,
    Success,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Confirmation => write!(f, "confirmation"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// Validation and transition errors. Each maps to a user-visible message
/// identifying the missing or invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Checkout opened with nothing to buy.
    #[error("your cart is empty")]
    EmptyCart,

    /// Checkout operation invoked with no active session.
    #[error("checkout has not been started")]
    NotStarted,

    /// Shipping step submitted without being signed in.
    #[error("please sign in to continue with your order")]
    NotAuthenticated,

    /// One or more required shipping fields are blank.
    #[error("required: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Shipping email fails structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Terms checkbox not ticked at confirmation.
    #[error("please agree to the terms and conditions")]
    TermsNotAccepted,

    /// Cash-on-delivery selected without an advance-payment reference.
    #[error("advance payment transaction ID is required for cash on delivery")]
    MissingTransactionId,

    /// Operation not valid for the session's current step.
    #[error("not available at the {0} step")]
    WrongStep(Step),
}

/// Shipping details collected at the first step.
///
/// Everything except the postal code is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingForm {
    /// Validate required fields and email shape.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` naming every blank required field, or
    /// `InvalidEmail` when the email is present but malformed.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("full name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        Email::parse(self.email.trim())?;
        Ok(())
    }
}

/// Transient checkout state. Created when the checkout UI opens over a
/// non-empty cart; dropped when it closes or the order succeeds.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    step: Step,
    shipping: ShippingForm,
    payment_method: PaymentMethod,
    transaction_id: String,
    agreed_to_terms: bool,
    order_id: Option<OrderId>,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    /// Start a fresh session at the shipping step with cash-on-delivery
    /// preselected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: Step::Shipping,
            shipping: ShippingForm::default(),
            payment_method: PaymentMethod::default(),
            transaction_id: String::new(),
            agreed_to_terms: false,
            order_id: None,
        }
    }

    /// Current wizard step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Shipping details as entered so far.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingForm {
        &self.shipping
    }

    /// Selected payment method.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Advance-payment transaction reference, if entered.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Order id recorded on success.
    #[must_use]
    pub const fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Replace the shipping form contents. No validation happens until the
    /// shopper tries to continue.
    pub fn set_shipping(&mut self, form: ShippingForm) {
        self.shipping = form;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn set_transaction_id(&mut self, transaction_id: impl Into<String>) {
        self.transaction_id = transaction_id.into();
    }

    pub fn set_agreed_to_terms(&mut self, agreed: bool) {
        self.agreed_to_terms = agreed;
    }

    /// `Shipping → Payment`.
    ///
    /// # Errors
    ///
    /// Fails when called outside the shipping step, when the caller is not
    /// authenticated, or when required shipping fields are missing or
    /// invalid. The session is unchanged on failure.
    pub fn continue_to_payment(&mut self, authenticated: bool) -> Result<(), CheckoutError> {
        if self.step != Step::Shipping {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if !authenticated {
            return Err(CheckoutError::NotAuthenticated);
        }
        self.shipping.validate()?;

        self.step = Step::Payment;
        Ok(())
    }

    /// `Payment → Confirmation`. A payment method is always selected (the
    /// default is cash-on-delivery), so there is no further guard.
    ///
    /// # Errors
    ///
    /// Fails when called outside the payment step.
    pub fn continue_to_confirmation(&mut self) -> Result<(), CheckoutError> {
        if self.step != Step::Payment {
            return Err(CheckoutError::WrongStep(self.step));
        }
        self.step = Step::Confirmation;
        Ok(())
    }

    /// Back-navigation: `Payment → Shipping` or `Confirmation → Payment`.
    /// Shipping has nowhere to go back to, and Success is terminal; both are
    /// no-ops.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Payment => Step::Shipping,
            Step::Confirmation => Step::Payment,
            other => other,
        };
    }

    /// Guard for `Confirmation → Success`, checked before the remote order
    /// submission is attempted.
    ///
    /// # Errors
    ///
    /// Fails when called outside the confirmation step, when the terms have
    /// not been agreed, or when cash-on-delivery lacks a transaction
    /// reference.
    pub fn ready_to_submit(&self) -> Result<(), CheckoutError> {
        if self.step != Step::Confirmation {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if !self.agreed_to_terms {
            return Err(CheckoutError::TermsNotAccepted);
        }
        if self.payment_method.requires_transaction_id() && self.transaction_id.trim().is_empty() {
            return Err(CheckoutError::MissingTransactionId);
        }
        Ok(())
    }

    /// Record a backend-accepted order and enter the terminal Success step.
    pub fn complete(&mut self, order_id: OrderId) {
        self.order_id = Some(order_id);
        self.step = Step::Success;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_form() -> ShippingForm {
        ShippingForm {
            full_name: "Ali Raza".to_string(),
            email: "ali@example.com".to_string(),
            phone: "03001234567".to_string(),
            address: "House 12, Street 4".to_string(),
            city: "Lahore".to_string(),
            postal_code: String::new(),
        }
    }

    /// Drive a session to the confirmation step.
    fn at_confirmation() -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.set_shipping(filled_form());
        session.continue_to_payment(true).unwrap();
        session.continue_to_confirmation().unwrap();
        session
    }

    #[test]
    fn test_unauthenticated_cannot_reach_payment() {
        let mut session = CheckoutSession::new();
        session.set_shipping(filled_form());

        assert_eq!(
            session.continue_to_payment(false),
            Err(CheckoutError::NotAuthenticated)
        );
        assert_eq!(session.step(), Step::Shipping);
    }

    #[test]
    fn test_missing_fields_block_payment() {
        let mut session = CheckoutSession::new();
        let mut form = filled_form();
        form.phone = String::new();
        form.city = "  ".to_string();
        session.set_shipping(form);

        let err = session.continue_to_payment(true).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MissingFields(vec!["phone", "city"])
        );
        assert_eq!(session.step(), Step::Shipping);
    }

    #[test]
    fn test_postal_code_is_optional() {
        let mut session = CheckoutSession::new();
        session.set_shipping(filled_form());
        session.continue_to_payment(true).unwrap();
        assert_eq!(session.step(), Step::Payment);
    }

    #[test]
    fn test_malformed_email_blocks_payment() {
        let mut session = CheckoutSession::new();
        let mut form = filled_form();
        form.email = "not-an-email".to_string();
        session.set_shipping(form);

        assert!(matches!(
            session.continue_to_payment(true),
            Err(CheckoutError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_terms_required_to_submit() {
        let mut session = at_confirmation();
        session.set_transaction_id("TXN-123");

        assert_eq!(
            session.ready_to_submit(),
            Err(CheckoutError::TermsNotAccepted)
        );

        session.set_agreed_to_terms(true);
        assert!(session.ready_to_submit().is_ok());
    }

    #[test]
    fn test_cod_requires_transaction_id() {
        let mut session = at_confirmation();
        session.set_agreed_to_terms(true);

        assert_eq!(
            session.ready_to_submit(),
            Err(CheckoutError::MissingTransactionId)
        );

        session.set_payment_method(PaymentMethod::BankTransfer);
        assert!(session.ready_to_submit().is_ok());
    }

    #[test]
    fn test_back_navigation() {
        let mut session = at_confirmation();
        session.back();
        assert_eq!(session.step(), Step::Payment);
        session.back();
        assert_eq!(session.step(), Step::Shipping);
        session.back();
        assert_eq!(session.step(), Step::Shipping);
    }

    #[test]
    fn test_success_is_terminal() {
        let mut session = at_confirmation();
        session.set_agreed_to_terms(true);
        session.set_transaction_id("TXN-123");
        session.ready_to_submit().unwrap();
        session.complete(OrderId::new("order-1"));

        assert_eq!(session.step(), Step::Success);
        session.back();
        assert_eq!(session.step(), Step::Success);
        assert_eq!(session.order_id(), Some(&OrderId::new("order-1")));
    }

    #[test]
    fn test_wrong_step_calls_rejected() {
        let mut session = CheckoutSession::new();
        assert_eq!(
            session.continue_to_confirmation(),
            Err(CheckoutError::WrongStep(Step::Shipping))
        );
        assert_eq!(
            session.ready_to_submit(),
            Err(CheckoutError::WrongStep(Step::Shipping))
        );
    }

    #[test]
    fn test_failed_guard_leaves_session_unchanged() {
        let mut session = at_confirmation();
        session.set_transaction_id("TXN-123");
        let before = (
            session.step(),
            session.shipping().clone(),
            session.payment_method(),
        );

        let _ = session.ready_to_submit().unwrap_err();

        assert_eq!(session.step(), before.0);
        assert_eq!(session.shipping(), &before.1);
        assert_eq!(session.payment_method(), before.2);
    }
}
