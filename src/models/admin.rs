use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::identity::Identity;

/// The role given to every admin created through sign-in.
pub const DEFAULT_ROLE: &str = "manager";

/// Represents a dashboard administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// The unique identifier for the admin.
    pub id: Uuid,
    /// The admin's email address, unique across admins.
    pub email: String,
    /// The admin's display name.
    pub name: String,
    /// The avatar URL from the identity provider, or empty.
    pub image: String,
    /// The admin's role.
    pub role: String,
    /// The timestamp when the admin was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// The identity a session carries for this admin.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<&Row> for Admin {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            image: row.get("image"),
            role: row.get("role"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// The fields written by a sign-in upsert.
#[derive(Debug, Clone)]
pub struct AdminUpsert {
    pub email: String,
    pub name: String,
    pub image: String,
    pub role: String,
}
