//! Storefront gateway port.
//!
//! The remote API service owns all persistence and business logic (pricing,
//! inventory, authentication, order processing); this trait is the narrow
//! request/response contract the client consumes it through. The `reqwest`
//! implementation lives in `melonmart-api`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{NewProductForm, Product, ProductId};
use crate::error::Result;
use crate::session::User;

/// Token issued by a successful credential exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Profile fields a user may edit after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub picture: String,
}

/// Body of the payment-creation request.
///
/// The wire contract carries the grand total and the paying customer; line
/// items stay client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub total: u64,
    pub customer: User,
}

/// Opaque transaction token handed to the payment widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub token: String,
}

/// The remote storefront API.
///
/// Every method maps to one endpoint. Non-2xx responses surface as
/// [`MartError::Api`](crate::MartError::Api) carrying the server-provided
/// message where one exists; transport failures as
/// [`MartError::Network`](crate::MartError::Network).
#[async_trait]
pub trait StorefrontGateway: Send + Sync {
    /// `POST /auth/register`. The response shape is implementation-defined,
    /// so it is passed through as raw JSON.
    async fn register(&self, username: &str, password: &str) -> Result<serde_json::Value>;

    /// `POST /auth/login`.
    async fn login(&self, username: &str, password: &str) -> Result<AuthToken>;

    /// `POST /auth/google` with a federated credential.
    async fn login_with_google(&self, credential: &str) -> Result<AuthToken>;

    /// `GET /auth/profile` with a bearer token.
    async fn fetch_profile(&self, token: &str) -> Result<User>;

    /// `PUT /auth/profile`.
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User>;

    /// `GET /products`.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// `GET /products/:id`.
    async fn product_detail(&self, id: &ProductId) -> Result<Product>;

    /// `POST /products` as a multipart form (seller upload).
    async fn create_product(&self, token: &str, form: &NewProductForm) -> Result<Product>;

    /// `POST /payment`; returns the transaction token for the widget.
    async fn create_payment(&self, token: &str, request: &PaymentRequest) -> Result<PaymentTransaction>;
}
