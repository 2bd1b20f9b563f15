// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token signing and validation.
//!
//! Tokens are stateless HS256 JWTs. There is no revocation: a token stays
//! valid until its embedded expiry, even if the user's plan changes after
//! issuance.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::models::User;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (internal user ID)
    pub sub: String,
    /// Subscription plan at issuance time (not required to round-trip)
    #[serde(default)]
    pub plan_type: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated principal extracted from a validated session token.
///
/// Carries only the subject id. Handlers that need the full profile must
/// re-fetch it from the user directory.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Capability contract for issuing and checking session tokens.
pub trait SessionTokenService: Send + Sync {
    /// Sign a session token bound to the user's id and plan.
    fn sign(&self, user: &User) -> Result<String>;

    /// Verify signature and expiry, returning the subject identity.
    fn validate(&self, token: &str) -> Result<AuthUser>;
}

/// HS256 session token service backed by a symmetric secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: u64,
}

impl JwtTokenService {
    /// Create a token service from a signing key and expiry in hours.
    ///
    /// The expiry must already be validated as positive (the config layer
    /// falls back to a default for bad values).
    pub fn new(signing_key: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            expiry_secs: expiry_hours.max(1) as u64 * 3600,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no clock-skew allowance.
        validation.leeway = 0;
        validation
    }
}

impl SessionTokenService for JwtTokenService {
    fn sign(&self, user: &User) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            plan_type: user.plan_type.clone(),
            iat: now,
            exp: now + self.expiry_secs as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token signing failed: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<AuthUser> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map_err(|_| AppError::InvalidToken)?;

        // A structurally valid token with an empty subject is still unusable.
        if token_data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(AuthUser {
            user_id: token_data.claims.sub,
        })
    }
}
