// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL directory integration tests.
//!
//! Require a live database; set TEST_DATABASE_URL to run them, e.g.
//! `TEST_DATABASE_URL=postgres://localhost/auth_gateway_test cargo test`.

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use auth_gateway::db::{PgUserDirectory, UserDirectory};
use auth_gateway::error::AppError;
use auth_gateway::models::User;

macro_rules! require_database {
    () => {
        match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("Skipping: TEST_DATABASE_URL not set");
                return;
            }
        }
    };
}

async fn test_pool(url: &str) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn candidate(firebase_uid: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4().to_string(),
        firebase_uid: firebase_uid.to_string(),
        email: email.to_string(),
        name: "Integration Test".to_string(),
        picture_url: String::new(),
        plan_type: "free".to_string(),
        premium_since: None,
        plan_expiry: None,
        created_at: now,
        updated_at: now,
    }
}

async fn cleanup(pool: &PgPool, firebase_uid: &str) {
    sqlx::query("DELETE FROM users WHERE firebase_uid = $1")
        .bind(firebase_uid)
        .execute(pool)
        .await
        .ok();
}

#[tokio::test]
async fn test_upsert_inserts_then_updates() {
    let url = require_database!();
    let pool = test_pool(&url).await;
    let directory = PgUserDirectory::new(pool.clone());

    let uid = format!("it-{}", Uuid::new_v4());

    let first = directory
        .upsert_by_firebase_uid(&candidate(&uid, "first@x.com"))
        .await
        .unwrap();
    let second = directory
        .upsert_by_firebase_uid(&candidate(&uid, "second@x.com"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.email, "second@x.com");
    assert_eq!(second.created_at, first.created_at);

    let fetched = directory.find_by_firebase_uid(&uid).await.unwrap();
    assert_eq!(fetched.id, first.id);

    cleanup(&pool, &uid).await;
}

#[tokio::test]
async fn test_find_miss_is_not_found() {
    let url = require_database!();
    let pool = test_pool(&url).await;
    let directory = PgUserDirectory::new(pool);

    let err = directory
        .find_by_firebase_uid("does-not-exist")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = directory.find_by_id("does-not-exist").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_first_logins_share_one_row() {
    let url = require_database!();
    let pool = test_pool(&url).await;
    let directory = Arc::new(PgUserDirectory::new(pool.clone()));

    let uid = format!("it-{}", Uuid::new_v4());

    // Two first logins racing on the same new identity. The UNIQUE
    // constraint forces the loser through the update fallback.
    let mut handles = Vec::new();
    for n in 0..2 {
        let directory = directory.clone();
        let uid = uid.clone();
        handles.push(tokio::spawn(async move {
            directory
                .upsert_by_firebase_uid(&candidate(&uid, &format!("race{}@x.com", n)))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        ids.push(user.id);
    }
    assert_eq!(ids[0], ids[1]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE firebase_uid = $1")
        .bind(&uid)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    cleanup(&pool, &uid).await;
}
