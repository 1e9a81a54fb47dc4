//! The storefront state container.
//!
//! [`Shop`] is the single owner of cart, checkout, session, and catalog
//! state. UI layers invoke its operations on user events and re-render from
//! its accessors; they never reach around it to mutate state directly. All
//! mutation happens on the driver's single logical flow — there is no
//! shared-mutable-state concern across sessions, since each session holds
//! its own store.

use synergy_core::{OrderId, PaymentMethod, Price, ProductId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::types::{OrderItem, OrderRequest, ShippingAddress, SignupRequest};
use crate::api::{ApiClient, ApiError};
use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::checkout::{CheckoutError, CheckoutSession, ShippingForm, Step};
use crate::config::StorefrontConfig;
use crate::content::{CategorySelection, DealPoster, FeaturedPopup};
use crate::error::ShopError;
use crate::session::UserSession;
use crate::store::{self, JsonFileStore, StateStore, keys};
use crate::whatsapp;

/// Outcome of a confirmed order submission.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    /// Identity of the order-of-record created on the backend.
    pub order_id: OrderId,
    /// Pre-filled WhatsApp notification link for the order desk.
    pub whatsapp_link: String,
}

/// Order submission failure.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A checkout guard blocked the submission; nothing was sent.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The backend rejected the order or was unreachable. The cart and
    /// checkout session are untouched, and `fallback_link` lets the shopper
    /// hand the order to the order desk manually so it is not silently
    /// lost.
    #[error("{message}")]
    Remote {
        /// User-facing failure message (the server's own when available).
        message: String,
        /// Manual WhatsApp fallback for the unsubmitted order.
        fallback_link: String,
    },
}

/// The storefront state container.
pub struct Shop {
    config: StorefrontConfig,
    client: ApiClient,
    store: Box<dyn StateStore>,
    catalog: Catalog,
    cart: Cart,
    session: UserSession,
    checkout: Option<CheckoutSession>,
    cart_open: bool,
}

impl Shop {
    /// Build a shop over an explicit store adapter, restoring any persisted
    /// cart and credential.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Box<dyn StateStore>) -> Self {
        let client = ApiClient::new(&config);
        let session = UserSession::restore(&client, store.as_ref());
        let cart = Cart::load(store.as_ref());

        Self {
            config,
            client,
            store,
            catalog: Catalog::default(),
            cart,
            session,
            checkout: None,
            cart_open: false,
        }
    }

    /// Build a shop with the file-backed store at the configured state
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, ShopError> {
        let store = JsonFileStore::new(config.state_dir.clone())?;
        Ok(Self::new(config, Box::new(store)))
    }

    /// Fetch the catalog snapshot and re-validate a restored credential.
    ///
    /// Both are best-effort: an unreachable backend leaves the catalog
    /// empty and the session signed out rather than failing startup.
    pub async fn init(&mut self) {
        match self.client.fetch_products(None).await {
            Ok(products) => self.catalog = Catalog::new(products),
            Err(e) => warn!(error = %e, "failed to fetch catalog"),
        }

        if let Err(e) = self.session.refresh(&self.client, self.store.as_ref()).await {
            warn!(error = %e, "failed to refresh session");
        }
    }

    /// Replace the catalog snapshot (e.g. after a keyword-free re-fetch).
    pub fn load_catalog(&mut self, products: Vec<Product>) {
        self.catalog = Catalog::new(products);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &UserSession {
        &self.session
    }

    /// Sign in and persist the returned credential.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        self.session
            .login(&self.client, self.store.as_ref(), email, password)
            .await
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the signup.
    pub async fn signup(&mut self, signup: &SignupRequest) -> Result<(), ApiError> {
        self.session
            .signup(&self.client, self.store.as_ref(), signup)
            .await
    }

    /// Sign out and drop the persisted credential.
    pub fn logout(&mut self) {
        self.session.logout(&self.client, self.store.as_ref());
    }

    /// Active checkout session, if the checkout UI is open.
    #[must_use]
    pub const fn checkout(&self) -> Option<&CheckoutSession> {
        self.checkout.as_ref()
    }

    /// Whether the cart side panel is open.
    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    /// Whether a bearer credential is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }

    // =========================================================================
    // Cart operations
    // =========================================================================

    /// Add `quantity` of a catalog product to the cart and open the cart
    /// panel. Unknown product ids are a silent no-op.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: u32) {
        let Some(product) = self.catalog.get(product_id).cloned() else {
            debug!(%product_id, "add_to_cart ignored unknown product");
            return;
        };

        self.cart.add(&product, quantity);
        self.cart_open = true;
        self.cart.persist(self.store.as_ref());
    }

    /// Remove a line from the cart. Absent ids are a no-op.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.cart.remove(product_id);
        self.cart.persist(self.store.as_ref());
    }

    /// Apply a signed quantity delta, floored at 1. Absent ids are a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, delta: i32) {
        self.cart.update_quantity(product_id, delta);
        self.cart.persist(self.store.as_ref());
    }

    /// Empty the cart and persist the empty state.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.cart.persist(self.store.as_ref());
    }

    /// Toggle the cart side panel.
    pub fn toggle_cart(&mut self) {
        self.cart_open = !self.cart_open;
    }

    // =========================================================================
    // Merchandising content
    // =========================================================================

    /// Home-page deal poster, falling back to the stock promotion.
    #[must_use]
    pub fn deal_poster(&self) -> DealPoster {
        store::load_or_default(self.store.as_ref(), keys::DEAL_POSTER)
    }

    pub fn set_deal_poster(&self, poster: &DealPoster) {
        store::save(self.store.as_ref(), keys::DEAL_POSTER, poster);
    }

    /// Featured-product popup configuration.
    #[must_use]
    pub fn featured_popup(&self) -> FeaturedPopup {
        store::load_or_default(self.store.as_ref(), keys::FEATURED_POPUP)
    }

    pub fn set_featured_popup(&self, popup: &FeaturedPopup) {
        store::save(self.store.as_ref(), keys::FEATURED_POPUP, popup);
    }

    /// Categories picked for the home page sections.
    #[must_use]
    pub fn home_categories(&self) -> CategorySelection {
        store::load_or_default(self.store.as_ref(), keys::HOME_CATEGORIES)
    }

    pub fn set_home_categories(&self, categories: &CategorySelection) {
        store::save(self.store.as_ref(), keys::HOME_CATEGORIES, categories);
    }

    /// Categories picked for the header menu.
    #[must_use]
    pub fn header_categories(&self) -> CategorySelection {
        store::load_or_default(self.store.as_ref(), keys::HEADER_CATEGORIES)
    }

    pub fn set_header_categories(&self, categories: &CategorySelection) {
        store::save(self.store.as_ref(), keys::HEADER_CATEGORIES, categories);
    }

    // =========================================================================
    // Checkout wizard
    // =========================================================================

    /// Open the checkout wizard over the current (non-empty) cart.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` when there is nothing to buy.
    pub fn begin_checkout(&mut self) -> Result<(), CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.cart_open = false;
        self.checkout = Some(CheckoutSession::new());
        Ok(())
    }

    /// Close the checkout wizard and discard its transient state.
    pub fn cancel_checkout(&mut self) {
        self.checkout = None;
    }

    /// Update the shipping form of the active checkout.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when no checkout is active.
    pub fn set_shipping(&mut self, form: ShippingForm) -> Result<(), CheckoutError> {
        self.active_checkout()?.set_shipping(form);
        Ok(())
    }

    /// Select a payment method.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when no checkout is active.
    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.active_checkout()?.set_payment_method(method);
        Ok(())
    }

    /// Record the advance-payment transaction reference.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when no checkout is active.
    pub fn set_transaction_id(&mut self, id: impl Into<String>) -> Result<(), CheckoutError> {
        self.active_checkout()?.set_transaction_id(id);
        Ok(())
    }

    /// Record agreement to the terms and conditions.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when no checkout is active.
    pub fn set_agreed_to_terms(&mut self, agreed: bool) -> Result<(), CheckoutError> {
        self.active_checkout()?.set_agreed_to_terms(agreed);
        Ok(())
    }

    /// `Shipping → Payment`, guarded on authentication and a complete form.
    ///
    /// # Errors
    ///
    /// Returns the guard failure; the session is unchanged.
    pub fn continue_to_payment(&mut self) -> Result<(), CheckoutError> {
        let authenticated = self.client.has_token();
        self.active_checkout()?.continue_to_payment(authenticated)
    }

    /// `Payment → Confirmation`.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when no checkout is active, or a wrong-step
    /// error.
    pub fn continue_to_confirmation(&mut self) -> Result<(), CheckoutError> {
        self.active_checkout()?.continue_to_confirmation()
    }

    /// Navigate one step back in the wizard.
    pub fn checkout_back(&mut self) {
        if let Some(checkout) = self.checkout.as_mut() {
            checkout.back();
        }
    }

    fn active_checkout(&mut self) -> Result<&mut CheckoutSession, CheckoutError> {
        self.checkout.as_mut().ok_or(CheckoutError::NotStarted)
    }

    // =========================================================================
    // Order submission
    // =========================================================================

    /// Submit the order-of-record to the backend (`Confirmation → Success`).
    ///
    /// On acceptance: the cart is cleared and persisted, the order is
    /// prepended to the local history, the checkout session enters Success,
    /// and the WhatsApp notification link (including the order id) is
    /// composed. The link is only ever composed after the submission
    /// outcome is known, so the messaging channel can never disagree with
    /// the order-of-record.
    ///
    /// # Errors
    ///
    /// Returns a guard failure when the session is not ready to submit, or
    /// a `Remote` failure carrying the server's message plus a manual
    /// WhatsApp fallback link. Failure leaves the cart and checkout session
    /// unchanged.
    pub async fn submit_order(&mut self) -> Result<OrderConfirmation, SubmitError> {
        let checkout = self
            .checkout
            .as_ref()
            .ok_or(CheckoutError::NotStarted)?;
        checkout.ready_to_submit()?;
        if !self.client.has_token() {
            return Err(CheckoutError::NotAuthenticated.into());
        }

        let request = build_order_request(&self.cart, checkout, self.config.shipping_price);
        let subtotal = self.cart.subtotal();
        let lines = self.cart.lines().to_vec();

        match self.client.place_order(&request).await {
            Ok(order) => {
                let order_id = order.id.clone();

                self.cart.clear();
                self.cart.persist(self.store.as_ref());
                self.session.record_order(order);
                if let Some(checkout) = self.checkout.as_mut() {
                    checkout.complete(order_id.clone());
                }

                let message = whatsapp::order_message(
                    &lines,
                    subtotal,
                    self.config.shipping_price,
                    Some(&order_id),
                );
                let whatsapp_link = whatsapp::deep_link(&self.config.whatsapp_number, &message);

                Ok(OrderConfirmation {
                    order_id,
                    whatsapp_link,
                })
            }
            Err(e) => {
                warn!(error = %e, "order submission failed");
                let message =
                    whatsapp::order_message(&lines, subtotal, self.config.shipping_price, None);
                Err(SubmitError::Remote {
                    message: e.to_string(),
                    fallback_link: whatsapp::deep_link(&self.config.whatsapp_number, &message),
                })
            }
        }
    }

    /// Current checkout step, if a checkout is active.
    #[must_use]
    pub fn checkout_step(&self) -> Option<Step> {
        self.checkout.as_ref().map(CheckoutSession::step)
    }
}

/// Snapshot the cart and checkout state into an order submission body.
fn build_order_request(
    cart: &Cart,
    checkout: &CheckoutSession,
    shipping_price: Price,
) -> OrderRequest {
    let shipping = checkout.shipping();
    let items_price = cart.subtotal();
    let transaction_id = checkout.transaction_id().trim();

    OrderRequest {
        order_items: cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                name: line.name.clone(),
                quantity: line.quantity,
                image: line.image.clone(),
                price: line.unit_price,
                product_id: line.product_id.clone(),
            })
            .collect(),
        shipping_address: ShippingAddress {
            full_name: shipping.full_name.trim().to_string(),
            address: shipping.address.trim().to_string(),
            city: shipping.city.trim().to_string(),
            postal_code: shipping.postal_code.trim().to_string(),
            phone: shipping.phone.trim().to_string(),
        },
        payment_method: checkout.payment_method(),
        items_price,
        shipping_price,
        tax_price: Price::ZERO,
        total_price: items_price + shipping_price,
        transaction_id: (!transaction_id.is_empty()).then(|| transaction_id.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::store::MemoryStore;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            api_url: url::Url::parse("http://localhost:5000/api").unwrap(),
            whatsapp_number: "923009786786".to_string(),
            shipping_price: Price::new(200),
            state_dir: std::path::PathBuf::from(".synergy"),
        }
    }

    fn shop() -> Shop {
        let mut shop = Shop::new(config(), Box::new(MemoryStore::new()));
        shop.load_catalog(vec![
            product("A", "Galaxy S24", 1000),
            product("B", "Redmi Note", 500),
        ]);
        shop
    }

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

    #[test]
    fn test_add_unknown_product_is_silent_noop() {
        let mut shop = shop();
        shop.add_to_cart(&ProductId::new("nope"), 1);
        assert!(shop.cart().is_empty());
        assert!(!shop.is_cart_open());
    }

    #[test]
    fn test_add_opens_cart_panel_and_persists() {
        let mut shop = shop();
        shop.add_to_cart(&ProductId::new("A"), 2);

        assert!(shop.is_cart_open());
        assert_eq!(shop.cart().item_count(), 2);
    }

    #[test]
    fn test_cart_survives_new_session_over_same_store() {
        let store = Box::new(MemoryStore::new());
        let mut shop = Shop::new(config(), store);
        shop.load_catalog(vec![product("A", "Galaxy S24", 1000)]);
        shop.add_to_cart(&ProductId::new("A"), 2);

        // New session over the same store adapter
        let Shop { store, .. } = shop;
        let reopened = Shop::new(config(), store);
        assert_eq!(reopened.cart().item_count(), 2);
        assert_eq!(reopened.cart().subtotal(), Price::new(2000));
    }

    #[test]
    fn test_begin_checkout_requires_nonempty_cart() {
        let mut shop = shop();
        assert_eq!(shop.begin_checkout(), Err(CheckoutError::EmptyCart));

        shop.add_to_cart(&ProductId::new("A"), 1);
        assert!(shop.begin_checkout().is_ok());
        assert_eq!(shop.checkout_step(), Some(Step::Shipping));
        assert!(!shop.is_cart_open());
    }

    #[test]
    fn test_unauthenticated_blocked_at_shipping() {
        let mut shop = shop();
        shop.add_to_cart(&ProductId::new("A"), 1);
        shop.begin_checkout().unwrap();
        shop.set_shipping(filled_form()).unwrap();

        assert_eq!(
            shop.continue_to_payment(),
            Err(CheckoutError::NotAuthenticated)
        );
        assert_eq!(shop.checkout_step(), Some(Step::Shipping));
    }

    #[test]
    fn test_authenticated_wizard_reaches_confirmation() {
        let mut shop = shop();
        shop.client().set_token("jwt-token");
        shop.add_to_cart(&ProductId::new("A"), 1);
        shop.begin_checkout().unwrap();
        shop.set_shipping(filled_form()).unwrap();

        shop.continue_to_payment().unwrap();
        shop.set_payment_method(PaymentMethod::CashOnDelivery).unwrap();
        shop.continue_to_confirmation().unwrap();
        assert_eq!(shop.checkout_step(), Some(Step::Confirmation));
    }

    #[tokio::test]
    async fn test_submit_blocked_before_guards_pass() {
        let mut shop = shop();
        shop.client().set_token("jwt-token");
        shop.add_to_cart(&ProductId::new("A"), 1);
        shop.begin_checkout().unwrap();
        shop.set_shipping(filled_form()).unwrap();
        shop.continue_to_payment().unwrap();
        shop.continue_to_confirmation().unwrap();

        // Terms not agreed: no request is sent, session unchanged
        let err = shop.submit_order().await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Checkout(CheckoutError::TermsNotAccepted)
        ));
        assert_eq!(shop.checkout_step(), Some(Step::Confirmation));
        assert_eq!(shop.cart().item_count(), 1);

        // COD without a transaction reference is also blocked
        shop.set_agreed_to_terms(true).unwrap();
        let err = shop.submit_order().await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Checkout(CheckoutError::MissingTransactionId)
        ));
    }

    #[test]
    fn test_order_request_snapshot() {
        let mut shop = shop();
        shop.client().set_token("jwt-token");
        shop.add_to_cart(&ProductId::new("A"), 2);
        shop.add_to_cart(&ProductId::new("B"), 1);
        shop.begin_checkout().unwrap();
        shop.set_shipping(filled_form()).unwrap();
        shop.continue_to_payment().unwrap();
        shop.continue_to_confirmation().unwrap();
        shop.set_transaction_id(" TXN-42 ").unwrap();

        let checkout = shop.checkout().unwrap();
        let request = build_order_request(shop.cart(), checkout, Price::new(200));

        assert_eq!(request.order_items.len(), 2);
        assert_eq!(request.items_price, Price::new(2500));
        assert_eq!(request.shipping_price, Price::new(200));
        assert_eq!(request.total_price, Price::new(2700));
        assert_eq!(request.tax_price, Price::ZERO);
        assert_eq!(request.transaction_id.as_deref(), Some("TXN-42"));
        assert_eq!(request.shipping_address.city, "Lahore");
    }

    /// One-shot HTTP stub: accepts a single request, reads it fully, and
    /// replies with `body` as JSON.
    fn spawn_backend(body: &'static str) -> std::net::SocketAddr {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(chunk.get(..n).unwrap());
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(buf.get(..end).unwrap()).to_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 201 Created\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn test_accepted_order_clears_cart_and_records_history() {
        let addr = spawn_backend(r#"{"_id": "order-77"}"#);
        let config = StorefrontConfig {
            api_url: url::Url::parse(&format!("http://{addr}/api")).unwrap(),
            whatsapp_number: "923009786786".to_string(),
            shipping_price: Price::new(200),
            state_dir: std::path::PathBuf::from(".synergy"),
        };

        let mut shop = Shop::new(config, Box::new(MemoryStore::new()));
        shop.load_catalog(vec![product("A", "Galaxy S24", 1000)]);
        shop.client().set_token("jwt-token");
        shop.add_to_cart(&ProductId::new("A"), 2);
        shop.begin_checkout().unwrap();
        shop.set_shipping(filled_form()).unwrap();
        shop.continue_to_payment().unwrap();
        shop.set_payment_method(PaymentMethod::BankTransfer).unwrap();
        shop.continue_to_confirmation().unwrap();
        shop.set_agreed_to_terms(true).unwrap();

        let confirmation = shop.submit_order().await.unwrap();

        assert_eq!(confirmation.order_id, OrderId::new("order-77"));
        assert!(confirmation.whatsapp_link.contains("order-77"));

        // Cart is cleared, the order heads the local history without a
        // re-fetch, and the wizard lands on Success.
        assert!(shop.cart().is_empty());
        assert_eq!(
            shop.session().orders().first().unwrap().id,
            OrderId::new("order-77")
        );
        assert_eq!(shop.checkout_step(), Some(Step::Success));

        // The empty cart was persisted, not just dropped in memory
        let Shop { store, .. } = shop;
        assert!(Cart::load(store.as_ref()).is_empty());
    }

    #[test]
    fn test_content_round_trips_through_shop() {
        let shop = shop();
        assert_eq!(shop.deal_poster(), DealPoster::default());

        let poster = DealPoster {
            title: "Eid Sale".to_string(),
            ..DealPoster::default()
        };
        shop.set_deal_poster(&poster);
        assert_eq!(shop.deal_poster(), poster);

        let picks = CategorySelection(vec!["Smartphones".to_string(), "Audio".to_string()]);
        shop.set_header_categories(&picks);
        assert_eq!(shop.header_categories(), picks);
        assert_eq!(shop.home_categories(), CategorySelection::default());
    }

    #[test]
    fn test_cancel_checkout_discards_session() {
        let mut shop = shop();
        shop.add_to_cart(&ProductId::new("A"), 1);
        shop.begin_checkout().unwrap();
        shop.cancel_checkout();

        assert!(shop.checkout().is_none());
        assert_eq!(
            shop.set_agreed_to_terms(true),
            Err(CheckoutError::NotStarted)
        );
    }
}
