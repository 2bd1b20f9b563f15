// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Protected API routes. Everything here sits behind `require_auth`.

use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::models::UserResponse;
use crate::services::AuthUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(me))
}

/// Return the caller's profile.
///
/// The middleware injects only the subject id, so the profile is re-fetched
/// from the directory on every call.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state.directory.find_by_id(&auth_user.user_id).await?;
    Ok(Json(user.into()))
}
