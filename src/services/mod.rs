// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod identity;
pub mod token;

pub use auth::AuthService;
pub use identity::{ExternalIdentity, FirebaseVerifier, IdentityVerifier};
pub use token::{AuthUser, Claims, JwtTokenService, SessionTokenService};
