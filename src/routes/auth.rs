// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes: login, password reset, and reserved endpoints.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse, ResetPasswordRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/exchange-token", post(exchange_token))
}

/// Verify a Firebase ID token, sync the user, and return a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (user, token) = state.auth.login_or_register(&req.firebase_token).await?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Trigger the provider's password-reset email flow.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<StatusCode> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.auth.reset_password(&req.email).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Direct registration without the identity provider. Reserved.
async fn register() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

/// Exchange a refresh or third-party token for a session token. Reserved.
async fn exchange_token() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
