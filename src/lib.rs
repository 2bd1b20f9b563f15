// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth-Gateway: Firebase-backed authentication gateway
//!
//! This crate verifies Firebase ID tokens against the identity provider,
//! synchronizes local user records, and issues the application's own
//! session tokens for subsequent request authentication.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::UserDirectory;
use services::{AuthService, SessionTokenService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub tokens: Arc<dyn SessionTokenService>,
    pub directory: Arc<dyn UserDirectory>,
}
