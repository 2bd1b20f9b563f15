//! User directory: persistent store of local user records.

pub mod postgres;

pub use postgres::PgUserDirectory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::User;

/// Capability contract for the user store.
///
/// Lookups return `NotFound` on a miss, never a bare null. Upsert is keyed
/// by the immutable Firebase UID and must stay idempotent under concurrent
/// logins for the same identity.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert the candidate if no row exists for its `firebase_uid`,
    /// otherwise refresh the provider-mirrored fields of the existing row.
    /// Returns the stored row either way.
    async fn upsert_by_firebase_uid(&self, candidate: &User) -> Result<User>;

    async fn find_by_id(&self, id: &str) -> Result<User>;

    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> Result<User>;

    async fn find_by_email(&self, email: &str) -> Result<User>;
}

/// Merge a verified candidate onto an existing row.
///
/// The provider is authoritative for `email`, `name` and `picture_url`;
/// the directory is authoritative for `plan_type`, `premium_since` and
/// `plan_expiry`, so a login can never clobber a business-set plan upgrade.
/// Identity and creation time never change.
pub fn merge_provider_fields(existing: &User, candidate: &User, now: DateTime<Utc>) -> User {
    User {
        id: existing.id.clone(),
        firebase_uid: existing.firebase_uid.clone(),
        email: candidate.email.clone(),
        name: candidate.name.clone(),
        picture_url: candidate.picture_url.clone(),
        plan_type: existing.plan_type.clone(),
        premium_since: existing.premium_since,
        plan_expiry: existing.plan_expiry,
        created_at: existing.created_at,
        updated_at: now,
    }
}
