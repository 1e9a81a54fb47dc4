//! User session: bearer credential, profile, and order history.
//!
//! The credential is held by the [`ApiClient`] and mirrored into the store
//! adapter so a returning session stays signed in. A rejected token on a
//! profile fetch is treated as a recovery trigger — the session logs itself
//! out locally rather than reporting an error the shopper cannot act on.

use tracing::warn;

use crate::api::types::{Order, SignupRequest, UserProfile};
use crate::api::{ApiClient, ApiError};
use crate::store::{self, StateStore, keys};

/// Authentication and order-history state for the active shopper.
#[derive(Debug, Default)]
pub struct UserSession {
    user: Option<UserProfile>,
    orders: Vec<Order>,
}

impl UserSession {
    /// Fresh, signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a previously persisted credential, if any.
    ///
    /// Only restores the token; the profile and order history are fetched
    /// by the next [`UserSession::refresh`].
    pub fn restore(client: &ApiClient, store: &dyn StateStore) -> Self {
        let token: Option<String> = store::load_or_default(store, keys::USER_TOKEN);
        if let Some(token) = token {
            client.set_token(&token);
        }
        Self::new()
    }

    /// Profile of the signed-in user, when known.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Past orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Sign in and adopt the returned credential.
    ///
    /// The order history is fetched best-effort; a history fetch failure
    /// does not fail the login.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the credentials.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        store: &dyn StateStore,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let auth = client.login(email, password).await?;

        client.set_token(&auth.token);
        store::save(store, keys::USER_TOKEN, &auth.token);
        self.user = Some(UserProfile {
            id: auth.id,
            name: auth.name,
            email: auth.email,
            is_admin: auth.is_admin,
        });

        match client.my_orders().await {
            Ok(orders) => self.orders = orders,
            Err(e) => warn!(error = %e, "failed to fetch order history after login"),
        }

        Ok(())
    }

    /// Create an account and sign in with the returned credential.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the signup.
    pub async fn signup(
        &mut self,
        client: &ApiClient,
        store: &dyn StateStore,
        signup: &SignupRequest,
    ) -> Result<(), ApiError> {
        let auth = client.signup(signup).await?;

        client.set_token(&auth.token);
        store::save(store, keys::USER_TOKEN, &auth.token);
        self.user = Some(UserProfile {
            id: auth.id,
            name: auth.name,
            email: auth.email,
            is_admin: auth.is_admin,
        });
        self.orders.clear();

        Ok(())
    }

    /// Drop the credential and all user-scoped state.
    pub fn logout(&mut self, client: &ApiClient, store: &dyn StateStore) {
        client.clear_token();
        if let Err(e) = store.delete(keys::USER_TOKEN) {
            warn!(error = %e, "failed to remove persisted credential");
        }
        self.user = None;
        self.orders.clear();
    }

    /// Re-fetch the profile and order history for a held credential.
    ///
    /// The two fetches are independent and run concurrently. A rejected
    /// credential forces a local logout and reports success — the session
    /// simply becomes signed-out.
    ///
    /// # Errors
    ///
    /// Returns an error only for non-auth failures (network, backend).
    pub async fn refresh(
        &mut self,
        client: &ApiClient,
        store: &dyn StateStore,
    ) -> Result<(), ApiError> {
        if !client.has_token() {
            return Ok(());
        }

        let (profile, orders) = tokio::join!(client.profile(), client.my_orders());

        match profile {
            Ok(user) => self.user = Some(user),
            Err(e) if e.is_auth_error() => {
                warn!("stored credential rejected, signing out locally");
                self.logout(client, store);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        match orders {
            Ok(orders) => self.orders = orders,
            Err(e) => warn!(error = %e, "failed to fetch order history"),
        }

        Ok(())
    }

    /// Record a just-placed order at the head of the history without
    /// re-fetching the whole list.
    pub fn record_order(&mut self, order: Order) {
        self.orders.insert(0, order);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::store::MemoryStore;
    use synergy_core::{OrderId, Price};

    fn client() -> ApiClient {
        let config = StorefrontConfig {
            api_url: url::Url::parse("http://localhost:5000/api").unwrap(),
            whatsapp_number: "923009786786".to_string(),
            shipping_price: Price::new(200),
            state_dir: std::path::PathBuf::from(".synergy"),
        };
        ApiClient::new(&config)
    }

    fn order(id: &str) -> Order {
        serde_json::from_value(serde_json::json!({ "_id": id })).unwrap()
    }

    #[test]
    fn test_restore_adopts_persisted_token() {
        let store = MemoryStore::new();
        store::save(&store, keys::USER_TOKEN, "jwt-token");

        let client = client();
        let session = UserSession::restore(&client, &store);

        assert!(client.has_token());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_restore_without_token() {
        let store = MemoryStore::new();
        let client = client();
        let _session = UserSession::restore(&client, &store);
        assert!(!client.has_token());
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = MemoryStore::new();
        store::save(&store, keys::USER_TOKEN, "jwt-token");
        let client = client();
        let mut session = UserSession::restore(&client, &store);
        session.record_order(order("o1"));

        session.logout(&client, &store);

        assert!(!client.has_token());
        assert!(session.orders().is_empty());
        let persisted: Option<String> = store::load_or_default(&store, keys::USER_TOKEN);
        assert!(persisted.is_none());
    }

    #[test]
    fn test_record_order_prepends() {
        let mut session = UserSession::new();
        session.record_order(order("older"));
        session.record_order(order("newest"));

        let ids: Vec<_> = session.orders().iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, vec![OrderId::new("newest"), OrderId::new("older")]);
    }
}
