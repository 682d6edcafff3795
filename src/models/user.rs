use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Whether a storefront user may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Allow,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Allow => "allow",
            UserStatus::Banned => "banned",
        }
    }

    /// Banned users are allowed again, everyone else is banned.
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Banned => UserStatus::Allow,
            UserStatus::Allow => UserStatus::Banned,
        }
    }

    pub fn parse(value: &str) -> Self {
        if value == "banned" {
            UserStatus::Banned
        } else {
            UserStatus::Allow
        }
    }
}

/// Represents a storefront customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub status: UserStatus,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        let status: String = row.get("status");
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            image: row.get("image"),
            status: UserStatus::parse(&status),
            created_at: row.get("created_at"),
        }
    }
}
