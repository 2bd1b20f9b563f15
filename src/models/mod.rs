// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod auth;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, ResetPasswordRequest};
pub use user::{User, UserResponse};
