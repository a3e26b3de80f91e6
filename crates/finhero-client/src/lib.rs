//! REST client for the FinHero backend API
//!
//! This crate owns transport details only: request serialization, timeout
//! and HTTP error mapping, and JSON decoding into wire records. Persisting
//! the session returned by `login`/`signup` is the caller's responsibility.

pub mod error;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use error::{ClientError, ClientErrorCode, ClientResult};

/// Minimum accepted password length, checked before any network call
pub const MIN_PASSWORD_LEN: usize = 6;

const LOGIN_FALLBACK: &str = "Network or server error during login";
const SIGNUP_FALLBACK: &str =
    "Could not create the account; the email may already be registered";
const GENERIC_FALLBACK: &str = "Network or server error";

// ==================== Wire Records ====================

/// User identity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Successful login/signup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque token to be presented on subsequent requests
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Transaction record on the wire
///
/// `kind` carries the direction ("expense" or "income"); `amount` is always
/// positive. The domain layer converts this into its own typed model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for creating a transaction (the backend assigns the id)
#[derive(Debug, Clone, Serialize)]
pub struct NewTransactionRecord {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Duo link state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuoStatus {
    /// No link and no outstanding invitation
    None,
    /// Invitation code issued, not yet consumed
    Pending,
    /// Both sides linked
    Connected,
}

impl std::fmt::Display for DuoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuoStatus::None => write!(f, "none"),
            DuoStatus::Pending => write!(f, "pending"),
            DuoStatus::Connected => write!(f, "connected"),
        }
    }
}

/// Duo link record; state lives server-side, the client only displays it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuoLinkRecord {
    pub status: DuoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<UserRecord>,
}

// ==================== Auth Seam ====================

/// Login/signup surface of the backend
///
/// Kept as a trait so the session service can be exercised against a mock
/// backend in tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and user identity
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse>;

    /// Register a new account and log it in
    async fn signup(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthResponse>;
}

/// Shared auth backend handle
pub type AuthRef = Arc<dyn AuthApi>;

/// Check the signup password precondition
///
/// Runs locally; a violation means no request is issued at all.
pub fn validate_password(password: &str) -> ClientResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation {
            message: format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ),
        });
    }
    Ok(())
}

// ==================== HTTP Client ====================

/// Reqwest-backed client for the FinHero REST API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with an explicit request timeout
    ///
    /// `base_url` should include the `/api` prefix; a trailing slash is
    /// tolerated.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ClientResult<T> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(normalize_failure(status, body.as_ref(), fallback));
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Transport {
            message: format!("invalid JSON payload: {}", e),
        })
    }

    async fn send_empty(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ClientResult<()> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(normalize_failure(status, body.as_ref(), fallback));
        }
        Ok(())
    }

    // ==================== Transactions ====================

    /// Fetch the full transaction list for the authenticated user
    pub async fn list_transactions(&self, token: &str) -> ClientResult<Vec<TransactionRecord>> {
        debug!("GET /transactions");
        self.send_json(
            self.client
                .get(self.url("/transactions"))
                .bearer_auth(token),
            GENERIC_FALLBACK,
        )
        .await
    }

    /// Create a transaction and return the stored record
    pub async fn create_transaction(
        &self,
        token: &str,
        record: &NewTransactionRecord,
    ) -> ClientResult<TransactionRecord> {
        debug!("POST /transactions title={:?}", record.title);
        self.send_json(
            self.client
                .post(self.url("/transactions"))
                .bearer_auth(token)
                .json(record),
            GENERIC_FALLBACK,
        )
        .await
    }

    /// Delete a transaction by id
    pub async fn delete_transaction(&self, token: &str, id: &str) -> ClientResult<()> {
        debug!("DELETE /transactions/{}", id);
        self.send_empty(
            self.client
                .delete(self.url(&format!("/transactions/{}", id)))
                .bearer_auth(token),
            GENERIC_FALLBACK,
        )
        .await
    }

    // ==================== Duo ====================

    /// Fetch the duo link record for a user
    pub async fn duo_status(&self, token: &str, user_id: &str) -> ClientResult<DuoLinkRecord> {
        debug!("GET /dupla/{}", user_id);
        self.send_json(
            self.client
                .get(self.url(&format!("/dupla/{}", user_id)))
                .bearer_auth(token),
            GENERIC_FALLBACK,
        )
        .await
    }

    /// Request a duo link with another user
    pub async fn duo_link(&self, token: &str, user_id: &str) -> ClientResult<DuoLinkRecord> {
        debug!("POST /dupla/link/{}", user_id);
        self.send_json(
            self.client
                .post(self.url(&format!("/dupla/link/{}", user_id)))
                .bearer_auth(token),
            GENERIC_FALLBACK,
        )
        .await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        debug!("POST /auth/login email={:?}", email);
        self.send_json(
            self.client
                .post(self.url("/auth/login"))
                .json(&LoginRequest { email, password }),
            LOGIN_FALLBACK,
        )
        .await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthResponse> {
        validate_password(password)?;
        debug!("POST /auth/signup email={:?}", email);
        self.send_json(
            self.client
                .post(self.url("/auth/signup"))
                .json(&SignupRequest {
                    name,
                    email,
                    password,
                }),
            SIGNUP_FALLBACK,
        )
        .await
    }
}

// ==================== Error Mapping ====================

fn map_transport_error(error: reqwest::Error) -> ClientError {
    ClientError::Transport {
        message: error.to_string(),
    }
}

/// Map a non-success HTTP response to a domain error
///
/// 401/403 become an authentication failure; anything else carries the
/// backend-supplied `message` field when present, the fallback otherwise.
fn normalize_failure(status: StatusCode, body: &[u8], fallback: &str) -> ClientError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ClientError::Unauthorized;
    }

    let message = backend_message(body).unwrap_or_else(|| fallback.to_string());
    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}

fn backend_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}
