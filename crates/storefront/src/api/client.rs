//! REST client implementation.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use synergy_core::ProductId;
use tracing::{debug, instrument};

use super::ApiError;
use super::types::{
    AuthUser, Credentials, ErrorBody, Order, OrderRequest, ProductInput, SignupRequest,
    UserProfile,
};
use crate::catalog::Product;
use crate::config::StorefrontConfig;

/// Cache key for the unfiltered product listing.
const PRODUCTS_CACHE_KEY: &str = "products";

/// Client for the storefront backend REST API.
///
/// Cheaply cloneable; the held bearer credential is shared across clones so
/// a login on one handle authenticates them all.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `https://shop.example.com/api`.
    base_url: String,
    token: RwLock<Option<SecretString>>,
    products_cache: Cache<String, Vec<Product>>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let products_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                token: RwLock::new(None),
                products_cache,
            }),
        }
    }

    // =========================================================================
    // Credential handling
    // =========================================================================

    /// Hold a bearer credential for subsequent authenticated calls.
    pub fn set_token(&self, token: &str) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(SecretString::from(token.to_owned()));
    }

    /// Drop the held credential.
    pub fn clear_token(&self) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a credential is currently held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_token(&self) -> Result<SecretString, ApiError> {
        self.token().ok_or(ApiError::NoCredential)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Send an unauthenticated request and normalize the response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        self.dispatch(request, false).await
    }

    /// Send a bearer-authenticated request. A 401/403 here means the held
    /// credential was rejected.
    async fn send_authed<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        self.dispatch(request, true).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        bearer: bool,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(normalize_failure(status, &body, bearer));
        }

        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List the catalog, optionally filtered by a name keyword.
    ///
    /// The unfiltered listing is cached; keyword searches always hit the
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self, keyword: Option<&str>) -> Result<Vec<Product>, ApiError> {
        if keyword.is_none()
            && let Some(products) = self.inner.products_cache.get(PRODUCTS_CACHE_KEY).await
        {
            debug!("cache hit for products");
            return Ok(products);
        }

        let mut request = self.inner.http.get(self.endpoint("products"));
        if let Some(keyword) = keyword {
            request = request.query(&[("keyword", keyword)]);
        }

        let products: Vec<Product> = self.send(request).await?;

        if keyword.is_none() {
            self.inner
                .products_cache
                .insert(PRODUCTS_CACHE_KEY.to_string(), products.clone())
                .await;
        }

        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let request = self
            .inner
            .http
            .get(self.endpoint(&format!("products/{product_id}")));
        self.send(request).await
    }

    /// Drop any cached product listing. Called after admin catalog changes.
    pub async fn invalidate_products(&self) {
        self.inner.products_cache.invalidate_all();
        self.inner.products_cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// `POST /users/login`.
    ///
    /// Returns the profile and token without holding the token; callers
    /// decide whether to adopt the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request
    /// fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ApiError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("users/login"))
            .json(&Credentials {
                email: email.to_owned(),
                password: password.to_owned(),
            });
        self.send(request).await
    }

    /// `POST /users` - create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the signup is rejected or the request fails.
    #[instrument(skip(self, signup))]
    pub async fn signup(&self, signup: &SignupRequest) -> Result<AuthUser, ApiError> {
        let request = self.inner.http.post(self.endpoint("users")).json(signup);
        self.send(request).await
    }

    /// `GET /users/profile` (bearer-authenticated).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the held token is rejected —
    /// callers treat that as a forced logout.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .get(self.endpoint("users/profile"))
            .bearer_auth(token.expose_secret());
        self.send_authed(request).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders/myorders` (bearer-authenticated).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .get(self.endpoint("orders/myorders"))
            .bearer_auth(token.expose_secret());
        self.send_authed(request).await
    }

    /// `POST /orders` (bearer-authenticated) - submit an order snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the backend's message when the order is
    /// rejected.
    #[instrument(skip(self, order))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<Order, ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .post(self.endpoint("orders"))
            .bearer_auth(token.expose_secret())
            .json(order);
        self.send_authed(request).await
    }

    // =========================================================================
    // Admin catalog management
    // =========================================================================

    /// `POST /upload` (admin, multipart) - upload product images.
    ///
    /// Returns the stored image URLs in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the request fails.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_images(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<String>, ApiError> {
        let token = self.require_token()?;

        let mut form = reqwest::multipart::Form::new();
        for (file_name, bytes) in files {
            let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
            form = form.part("images", part);
        }

        let request = self
            .inner
            .http
            .post(self.endpoint("upload"))
            .bearer_auth(token.expose_secret())
            .multipart(form);
        self.send_authed(request).await
    }

    /// `POST /products` (admin) - create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &ProductInput) -> Result<Product, ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .post(self.endpoint("products"))
            .bearer_auth(token.expose_secret())
            .json(product);

        let created = self.send_authed(request).await?;
        self.invalidate_products().await;
        Ok(created)
    }

    /// `PUT /products/:id` (admin) - update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self, product), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        product: &ProductInput,
    ) -> Result<Product, ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .put(self.endpoint(&format!("products/{product_id}")))
            .bearer_auth(token.expose_secret())
            .json(product);

        let updated = self.send_authed(request).await?;
        self.invalidate_products().await;
        Ok(updated)
    }

    /// `DELETE /products/:id` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let request = self
            .inner
            .http
            .delete(self.endpoint(&format!("products/{product_id}")))
            .bearer_auth(token.expose_secret());

        let _: serde_json::Value = self.send_authed(request).await?;
        self.invalidate_products().await;
        Ok(())
    }
}

/// Map a non-success response to an [`ApiError`].
///
/// 401/403 on a bearer-authenticated call means the held credential was
/// rejected and callers must re-authenticate. Everywhere else (a wrong
/// password on login, a rejected signup) the status carries the server's
/// own `message`, which must survive normalization.
fn normalize_failure(status: reqwest::StatusCode, body: &str, bearer: bool) -> ApiError {
    if bearer
        && (status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN)
    {
        return ApiError::Unauthorized;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| format!("request failed with status {status}"));
    ApiError::Remote {
        status: status.as_u16(),
        message,
    }
}
