// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL-backed user directory.
//!
//! The `users` table carries a UNIQUE constraint on `firebase_uid`; the
//! upsert relies on it to resolve the read-then-write race between two
//! concurrent first logins for the same identity.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{merge_provider_fields, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, firebase_uid, email, name, picture_url, plan_type, premium_since, plan_expiry, \
     created_at, updated_at";

/// User directory backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_firebase_uid(&self, firebase_uid: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE firebase_uid = $1",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(firebase_uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// Insert a new user row. A duplicate `firebase_uid` surfaces as
    /// `Conflict` so the caller can fall back to an update.
    async fn insert(&self, user: &User) -> Result<User> {
        let query = format!(
            "INSERT INTO users ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) \
             RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&user.id)
            .bind(&user.firebase_uid)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.picture_url)
            .bind(&user.plan_type)
            .bind(user.premium_since)
            .bind(user.plan_expiry)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// Refresh the provider-mirrored fields of an existing row.
    async fn update_mirrored(&self, existing: &User, candidate: &User) -> Result<User> {
        let merged = merge_provider_fields(existing, candidate, chrono::Utc::now());

        let query = format!(
            "UPDATE users \
             SET email = $1, name = $2, picture_url = $3, updated_at = $4 \
             WHERE id = $5 \
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&merged.email)
            .bind(&merged.name)
            .bind(&merged.picture_url)
            .bind(merged.updated_at)
            .bind(&merged.id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn fetch_one_by(&self, column: &'static str, value: &str) -> Result<User> {
        let query = format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, column
        );

        sqlx::query_as::<_, User>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("user with {} = {}", column, value)))
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn upsert_by_firebase_uid(&self, candidate: &User) -> Result<User> {
        if let Some(existing) = self.fetch_by_firebase_uid(&candidate.firebase_uid).await? {
            return self.update_mirrored(&existing, candidate).await;
        }

        match self.insert(candidate).await {
            Ok(user) => Ok(user),
            Err(AppError::Conflict(_)) => {
                // Lost the insert race: a concurrent login created the row
                // between our lookup and insert. Retry once as an update.
                tracing::debug!(
                    firebase_uid = %candidate.firebase_uid,
                    "Insert conflict on upsert, retrying as update"
                );
                let existing = self
                    .fetch_by_firebase_uid(&candidate.firebase_uid)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("user row missing after insert conflict".to_string())
                    })?;
                self.update_mirrored(&existing, candidate).await
            }
            Err(err) => Err(err),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<User> {
        self.fetch_one_by("id", id).await
    }

    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> Result<User> {
        self.fetch_one_by("firebase_uid", firebase_uid).await
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        self.fetch_one_by("email", email).await
    }
}

/// Classify sqlx errors: uniqueness violations become `Conflict`, everything
/// else is a generic database error.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(db_err.to_string());
        }
    }
    AppError::Database(err.to_string())
}
