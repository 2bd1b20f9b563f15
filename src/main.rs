// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth-Gateway API Server
//!
//! Accepts Firebase ID tokens, verifies them against the identity provider,
//! synchronizes local user records, and issues application session tokens.

use auth_gateway::{
    config::Config,
    db::PgUserDirectory,
    services::{AuthService, FirebaseVerifier, JwtTokenService},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Auth-Gateway API");

    // Initialize PostgreSQL pool and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Connected to PostgreSQL");

    let directory: Arc<dyn auth_gateway::db::UserDirectory> =
        Arc::new(PgUserDirectory::new(pool));

    // Firebase verification adapter
    let verifier = Arc::new(
        FirebaseVerifier::new(config.firebase_api_key.clone())
            .expect("Failed to initialize Firebase verifier"),
    );
    tracing::info!("Firebase verifier initialized");

    // Session token service
    let tokens: Arc<dyn auth_gateway::services::SessionTokenService> = Arc::new(
        JwtTokenService::new(&config.jwt_signing_key, config.token_expiry_hours),
    );
    tracing::info!(
        expiry_hours = config.token_expiry_hours,
        "Session token service initialized"
    );

    let auth = AuthService::new(verifier, directory.clone(), tokens.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        auth,
        tokens,
        directory,
    });

    // Build router
    let app = auth_gateway::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auth_gateway=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
