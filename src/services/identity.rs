// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase identity verification adapter.
//!
//! Wraps the Identity Toolkit REST API. Verification is two sequential
//! provider calls: verify the presented ID token to obtain its subject,
//! then fetch the canonical profile for that subject. Both must succeed;
//! no partial identity is ever returned.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, Result};

const IDENTITY_TOOLKIT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Verified identity returned by the provider for a credential.
///
/// Transient: produced once per verification call, never cached.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    /// Provider-assigned subject identifier (Firebase UID)
    pub uid: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    /// Pre-existing local user id, when the provider record carries one
    pub app_user_id: Option<String>,
}

/// Capability contract for external identity verification.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a credential and fetch the canonical profile for its subject.
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity>;

    /// Trigger the provider's password-reset flow for an email address.
    async fn send_password_reset(&self, email: &str) -> Result<()>;
}

/// Identity Toolkit REST client.
pub struct FirebaseVerifier {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseVerifier {
    /// Create a verifier using the production Identity Toolkit endpoint.
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("failed building Firebase HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: IDENTITY_TOOLKIT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Verify an ID token and return the account it belongs to.
    async fn lookup_by_id_token(&self, id_token: &str) -> Result<FirebaseUserRecord> {
        let url = format!("{}/accounts:lookup?key={}", self.base_url, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let body: LookupResponse = check_response_json(response).await?;
        single_user(body)
    }

    /// Fetch the canonical profile for a known UID.
    async fn lookup_by_uid(&self, uid: &str) -> Result<FirebaseUserRecord> {
        let url = format!("{}/accounts:lookup?key={}", self.base_url, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "localId": [uid] }))
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let body: LookupResponse = check_response_json(response).await?;
        single_user(body)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity> {
        let token_record = self.lookup_by_id_token(credential).await?;
        let profile = self.lookup_by_uid(&token_record.local_id).await?;
        Ok(profile.into_identity())
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let url = format!("{}/accounts:sendOobCode?key={}", self.base_url, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
                "returnOobLink": true,
            }))
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let body: OobCodeResponse = check_response_json(response).await?;

        // An HTTP 200 with no usable link is a silent provider no-op; treat
        // it as a failure rather than reporting success to the caller.
        match body.oob_link {
            Some(link) if !link.is_empty() => Ok(()),
            _ => Err(AppError::Provider(
                "provider returned no password reset link".to_string(),
            )),
        }
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
}

/// Extract exactly one user record from a lookup response.
fn single_user(body: LookupResponse) -> Result<FirebaseUserRecord> {
    body.users
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Provider("no account found for credential".to_string()))
}

/// Response from `accounts:lookup`.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    users: Option<Vec<FirebaseUserRecord>>,
}

/// A single account record as returned by the Identity Toolkit API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseUserRecord {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl FirebaseUserRecord {
    fn into_identity(self) -> ExternalIdentity {
        ExternalIdentity {
            uid: self.local_id,
            email: self.email.unwrap_or_default(),
            name: self.display_name.unwrap_or_default(),
            picture: self.photo_url.unwrap_or_default(),
            app_user_id: None,
        }
    }
}

/// Response from `accounts:sendOobCode`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeResponse {
    #[serde(default)]
    oob_link: Option<String>,
}
