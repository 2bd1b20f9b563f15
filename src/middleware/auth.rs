// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::AppState;

/// Middleware that requires a valid `Authorization: Bearer` session token.
///
/// On success the resolved subject is injected into request extensions as
/// [`crate::services::AuthUser`]. The full user profile is never injected;
/// handlers that need it re-fetch from the directory.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => return Err(AppError::Unauthorized),
    };

    let auth_user = state.tokens.validate(token)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
