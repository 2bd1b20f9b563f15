// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication orchestration: verify the external credential, sync the
//! local user record, issue a session token.

use std::sync::Arc;
use uuid::Uuid;

use crate::db::UserDirectory;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::identity::{ExternalIdentity, IdentityVerifier};
use crate::services::token::SessionTokenService;

/// Initial plan for newly created accounts.
const DEFAULT_PLAN: &str = "free";

/// Composes identity verification, the user directory, and token issuance.
#[derive(Clone)]
pub struct AuthService {
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn UserDirectory>,
    tokens: Arc<dyn SessionTokenService>,
}

impl AuthService {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        directory: Arc<dyn UserDirectory>,
        tokens: Arc<dyn SessionTokenService>,
    ) -> Self {
        Self {
            verifier,
            directory,
            tokens,
        }
    }

    /// Verify a Firebase ID token, upsert the local user, and sign a
    /// session token for them.
    ///
    /// Any verification failure (bad credential or unreachable provider)
    /// surfaces as `Unauthorized` with no local state touched. A signing
    /// failure after a successful upsert surfaces as `Internal` and leaves
    /// the user row committed: identity sync succeeded, only session
    /// issuance failed.
    pub async fn login_or_register(&self, firebase_token: &str) -> Result<(User, String)> {
        let identity = match self.verifier.verify(firebase_token).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "Firebase token verification failed");
                return Err(AppError::Unauthorized);
            }
        };

        let candidate = candidate_from_identity(identity);
        let user = self.directory.upsert_by_firebase_uid(&candidate).await?;

        let token = self.tokens.sign(&user)?;

        tracing::info!(user_id = %user.id, firebase_uid = %user.firebase_uid, "Login successful");
        Ok((user, token))
    }

    /// Trigger the provider's password-reset flow. No local state is touched.
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.verifier.send_password_reset(email).await
    }
}

/// Build the candidate user record from a verified identity.
///
/// The id defaults to a fresh UUID unless the provider record carries a
/// known local id hint. Plan fields start at their defaults; the directory
/// preserves existing business state on update.
fn candidate_from_identity(identity: ExternalIdentity) -> User {
    let now = chrono::Utc::now();
    let id = identity
        .app_user_id
        .filter(|hint| !hint.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    User {
        id,
        firebase_uid: identity.uid,
        email: identity.email,
        name: identity.name,
        picture_url: identity.picture,
        plan_type: DEFAULT_PLAN.to_string(),
        premium_since: None,
        plan_expiry: None,
        created_at: now,
        updated_at: now,
    }
}
