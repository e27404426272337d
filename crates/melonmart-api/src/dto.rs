//! Wire DTOs for the storefront API.
//!
//! Kept separate from the domain models: the backend wraps some payloads in
//! envelopes (`{"userData": ...}`) and error bodies in `{"message": ...}`,
//! and those shapes should not leak past this crate.

use serde::Deserialize;

use melonmart_core::User;

/// Envelope around the profile endpoints' payload.
#[derive(Debug, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(rename = "userData")]
    pub user_data: User,
}

/// Successful credential exchange.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Successful payment creation: the transaction token for the widget.
#[derive(Debug, Deserialize)]
pub struct PaymentResponse {
    pub token: String,
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_envelope_unwraps_user_data() {
        let json = r#"{"userData": {"id": 3, "username": "budi", "email": "budi@example.com"}}"#;
        let envelope: ProfileEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.user_data.id, 3);
        assert_eq!(envelope.user_data.username, "budi");
    }

    #[test]
    fn test_auth_response_ignores_extra_fields() {
        let json = r#"{"token": "jwt-1", "message": "Login sukses"}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.token, "jwt-1");
    }

    #[test]
    fn test_error_body_without_message() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
