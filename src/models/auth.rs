// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response bodies for the auth endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Firebase ID token obtained by the client SDK
    #[validate(length(min = 1, message = "firebase_token must not be empty"))]
    pub firebase_token: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "email is not valid"))]
    pub email: String,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Locally signed session token
    pub token: String,
    pub user: UserResponse,
}
