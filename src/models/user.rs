//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record stored in the `users` table.
///
/// `email`, `name` and `picture_url` mirror the identity provider and are
/// refreshed on every login. `plan_type`, `premium_since` and `plan_expiry`
/// are local business state and survive logins untouched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Internal ID (UUID string), stable for the life of the account
    pub id: String,
    /// Firebase UID, unique and immutable once set
    pub firebase_uid: String,
    /// Email address mirrored from Firebase
    pub email: String,
    /// Display name mirrored from Firebase
    pub name: String,
    /// Profile picture URL mirrored from Firebase
    pub picture_url: String,
    /// Subscription plan (local business attribute)
    pub plan_type: String,
    /// When the user first became a premium subscriber
    pub premium_since: Option<DateTime<Utc>>,
    /// When the current plan expires
    pub plan_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public user representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture_url: String,
    pub plan_type: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            picture_url: user.picture_url,
            plan_type: user.plan_type,
        }
    }
}
