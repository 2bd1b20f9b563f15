// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: fake provider, in-memory directory, test app.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use auth_gateway::config::Config;
use auth_gateway::db::{merge_provider_fields, UserDirectory};
use auth_gateway::error::{AppError, Result};
use auth_gateway::models::User;
use auth_gateway::routes::create_router;
use auth_gateway::services::{
    AuthService, AuthUser, ExternalIdentity, IdentityVerifier, JwtTokenService,
    SessionTokenService,
};
use auth_gateway::AppState;

/// Fake identity provider keyed by credential string.
#[derive(Default)]
pub struct FakeVerifier {
    identities: HashMap<String, ExternalIdentity>,
    reset_fails: bool,
}

#[allow(dead_code)]
impl FakeVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential that verifies to the given identity.
    pub fn with_identity(mut self, credential: &str, identity: ExternalIdentity) -> Self {
        self.identities.insert(credential.to_string(), identity);
        self
    }

    pub fn with_failing_reset(mut self) -> Self {
        self.reset_fails = true;
        self
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity> {
        self.identities
            .get(credential)
            .cloned()
            .ok_or_else(|| AppError::Provider("credential rejected".to_string()))
    }

    async fn send_password_reset(&self, _email: &str) -> Result<()> {
        if self.reset_fails {
            return Err(AppError::Provider("reset link unavailable".to_string()));
        }
        Ok(())
    }
}

/// In-memory user directory with call counting.
#[derive(Default)]
pub struct InMemoryDirectory {
    rows: Mutex<HashMap<String, User>>,
    pub upsert_calls: AtomicUsize,
}

#[allow(dead_code)]
impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing upsert (for seeding business state).
    pub fn seed(&self, user: User) {
        self.rows
            .lock()
            .unwrap()
            .insert(user.firebase_uid.clone(), user);
    }

    pub fn get(&self, firebase_uid: &str) -> Option<User> {
        self.rows.lock().unwrap().get(firebase_uid).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn upsert_by_firebase_uid(&self, candidate: &User) -> Result<User> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();

        let stored = match rows.get(&candidate.firebase_uid) {
            Some(existing) => merge_provider_fields(existing, candidate, now),
            None => {
                let mut user = candidate.clone();
                user.created_at = now;
                user.updated_at = now;
                user
            }
        };

        rows.insert(stored.firebase_uid.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> Result<User> {
        self.get(firebase_uid)
            .ok_or_else(|| AppError::NotFound(format!("user with uid {}", firebase_uid)))
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user with email {}", email)))
    }
}

/// Token service that always fails to sign (misconfigured signer).
#[allow(dead_code)]
pub struct FailingSigner;

impl SessionTokenService for FailingSigner {
    fn sign(&self, _user: &User) -> Result<String> {
        Err(AppError::Internal(anyhow::anyhow!("signer misconfigured")))
    }

    fn validate(&self, _token: &str) -> Result<AuthUser> {
        Err(AppError::InvalidToken)
    }
}

/// A verified identity for tests.
#[allow(dead_code)]
pub fn sample_identity(uid: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity {
        uid: uid.to_string(),
        email: email.to_string(),
        name: "Test User".to_string(),
        picture: "https://example.com/pic.png".to_string(),
        app_user_id: None,
    }
}

/// Build an auth service over the given fakes with a real token service.
#[allow(dead_code)]
pub fn test_auth_service(
    verifier: Arc<FakeVerifier>,
    directory: Arc<InMemoryDirectory>,
) -> AuthService {
    let config = Config::test_default();
    let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_signing_key,
        config.token_expiry_hours,
    ));
    AuthService::new(verifier, directory, tokens)
}

/// Create a test app with fake provider and in-memory directory.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(
    verifier: Arc<FakeVerifier>,
    directory: Arc<InMemoryDirectory>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_signing_key,
        config.token_expiry_hours,
    ));
    let auth = AuthService::new(verifier, directory.clone(), tokens.clone());

    let state = Arc::new(AppState {
        config,
        auth,
        tokens,
        directory,
    });

    (create_router(state.clone()), state)
}
