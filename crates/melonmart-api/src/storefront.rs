//! HTTP implementation of the storefront gateway.
//!
//! One method per endpoint. Non-2xx responses become `MartError::Api` with
//! the server's `message` field when the body carries one, otherwise the
//! endpoint's fixed fallback string. Transport failures become
//! `MartError::Network`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use melonmart_core::{
    AuthToken, MartError, NewProductForm, PaymentRequest, PaymentTransaction, Product, ProductId,
    ProfileUpdate, Result, StorefrontGateway, User,
};

use crate::dto::{AuthResponse, ErrorBody, PaymentResponse, ProfileEnvelope};

/// Builds the `Api` error for a non-2xx response body.
///
/// Prefers the server-provided `message`; falls back to the endpoint's
/// fixed string when the body is empty or not the expected shape.
pub(crate) fn api_error(status: u16, body: &str, fallback: &str) -> MartError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    MartError::api(status, message)
}

fn transport_error(err: reqwest::Error) -> MartError {
    if err.is_decode() {
        MartError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else {
        MartError::network(err.to_string())
    }
}

/// `reqwest`-backed [`StorefrontGateway`].
#[derive(Debug, Clone)]
pub struct HttpStorefrontGateway {
    client: Client,
    base_url: String,
}

impl HttpStorefrontGateway {
    /// Creates a gateway against the given API base origin, e.g.
    /// `http://localhost:4000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Replaces the underlying HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the status and decodes the body, or produces the mapped error.
    async fn expect_json<T: serde::de::DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body, fallback));
        }
        response.json::<T>().await.map_err(transport_error)
    }

    fn multipart_form(form: &NewProductForm) -> Result<Form> {
        let mut multipart = Form::new()
            .text("name", form.name.clone())
            .text("price", form.price.to_string())
            .text("category", form.category.clone())
            .text("description", form.description.clone())
            .text("origin", form.origin.clone());
        if let Some(date) = form.harvest_date {
            multipart = multipart.text("harvestDate", date.to_string());
        }
        if let Some(brix) = form.sweetness_brix {
            multipart = multipart.text("sweetnessBrix", brix.to_string());
        }
        if let Some(stock) = form.stock {
            multipart = multipart.text("stock", stock.to_string());
        }
        if let Some(grade) = &form.quality_grade {
            multipart = multipart.text("qualityGrade", grade.clone());
        }
        if let Some(image) = &form.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.filename.clone())
                .mime_str(&image.mime)
                .map_err(|err| MartError::validation(format!("invalid image mime type: {err}")))?;
            multipart = multipart.part("image", part);
        }
        Ok(multipart)
    }
}

#[async_trait]
impl StorefrontGateway for HttpStorefrontGateway {
    async fn register(&self, username: &str, password: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::expect_json(response, "Registration failed").await
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthToken> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;
        let auth: AuthResponse = Self::expect_json(response, "Login failed").await?;
        Ok(AuthToken { token: auth.token })
    }

    async fn login_with_google(&self, credential: &str) -> Result<AuthToken> {
        let response = self
            .client
            .post(self.url("/auth/google"))
            .json(&serde_json::json!({ "credential": credential }))
            .send()
            .await
            .map_err(transport_error)?;
        let auth: AuthResponse = Self::expect_json(response, "Google Login failed").await?;
        Ok(AuthToken { token: auth.token })
    }

    async fn fetch_profile(&self, token: &str) -> Result<User> {
        let response = self
            .client
            .get(self.url("/auth/profile"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: ProfileEnvelope =
            Self::expect_json(response, "Gagal mengambil profil").await?;
        Ok(envelope.user_data)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User> {
        let response = self
            .client
            .put(self.url("/auth/profile"))
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body, "Gagal update profil"));
        }
        // The backend is inconsistent about enveloping this payload.
        let body = response.text().await.map_err(transport_error)?;
        if let Ok(envelope) = serde_json::from_str::<ProfileEnvelope>(&body) {
            return Ok(envelope.user_data);
        }
        Ok(serde_json::from_str::<User>(&body)?)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let response = self
            .client
            .get(self.url("/products"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::expect_json(response, "Gagal mengambil data melon").await
    }

    async fn product_detail(&self, id: &ProductId) -> Result<Product> {
        let response = self
            .client
            .get(self.url(&format!("/products/{id}")))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(MartError::not_found("product", id.as_str()));
        }
        Self::expect_json(response, "Melon tidak ditemukan").await
    }

    async fn create_product(&self, token: &str, form: &NewProductForm) -> Result<Product> {
        let multipart = Self::multipart_form(form)?;
        debug!(name = %form.name, "uploading seller product");
        let response = self
            .client
            .post(self.url("/products"))
            .bearer_auth(token)
            .multipart(multipart)
            .send()
            .await
            .map_err(transport_error)?;
        Self::expect_json(response, "Gagal upload produk").await
    }

    async fn create_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentTransaction> {
        let response = self
            .client
            .post(self.url("/payment"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let payment: PaymentResponse = Self::expect_json(response, "Gagal checkout").await?;
        Ok(PaymentTransaction {
            token: payment.token,
        })
    }
}
