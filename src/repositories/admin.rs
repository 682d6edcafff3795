use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        admin::{Admin, AdminUpsert},
        pagination::{PageRequest, Paginated},
    },
};

const ADMIN_COLUMNS: &str = "id, email, name, image, role, created_at, updated_at";

/// Persistence for dashboard administrators.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Inserts the admin or, when the email exists, updates it. Idempotent.
    async fn upsert(&self, admin: AdminUpsert) -> Result<Admin>;

    /// Finds an admin by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Admin>>;

    /// Lists admins, newest first.
    async fn list(&self, page: PageRequest) -> Result<Paginated<Admin>>;

    /// Deletes an admin. Returns whether a row was removed.
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}

/// The PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgAdminStore {
    pool: Pool,
}

impl PgAdminStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn upsert(&self, admin: AdminUpsert) -> Result<Admin> {
        let client = self.pool.get().await?;
        let query = format!(
            r#"
            INSERT INTO admins (email, name, image, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                image = EXCLUDED.image,
                role = EXCLUDED.role,
                updated_at = NOW()
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        );
        let statement = client.prepare_cached(&query).await?;
        let row = client
            .query_one(
                &statement,
                &[&admin.email, &admin.name, &admin.image, &admin.role],
            )
            .await?;
        Ok(Admin::from(&row))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Admin>> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS);
        let statement = client.prepare_cached(&query).await?;
        let row = client.query_opt(&statement, &[id]).await?;
        Ok(row.as_ref().map(Admin::from))
    }

    async fn list(&self, page: PageRequest) -> Result<Paginated<Admin>> {
        let page = page.normalized();
        let client = self.pool.get().await?;

        let count_row = client.query_one("SELECT COUNT(*) AS total FROM admins", &[]).await?;
        let total: i64 = count_row.get("total");

        let query = format!(
            "SELECT {} FROM admins ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            ADMIN_COLUMNS
        );
        let statement = client.prepare_cached(&query).await?;
        let rows = client
            .query(
                &statement,
                &[&(page.limit as i64), &(page.offset() as i64)],
            )
            .await?;

        Ok(Paginated {
            data: rows.iter().map(Admin::from).collect(),
            count: total.max(0) as u64,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let removed = client
            .execute("DELETE FROM admins WHERE id = $1", &[id])
            .await?;
        Ok(removed > 0)
    }
}

/// An in-process store, used by tests and local runs without PostgreSQL.
#[derive(Clone, Default)]
pub struct MemoryAdminStore {
    admins: Arc<RwLock<Vec<Admin>>>,
}

impl MemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.admins.read().await.len()
    }
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn upsert(&self, admin: AdminUpsert) -> Result<Admin> {
        let mut admins = self.admins.write().await;
        let now = Utc::now();
        if let Some(existing) = admins.iter_mut().find(|a| a.email == admin.email) {
            existing.name = admin.name;
            existing.image = admin.image;
            existing.role = admin.role;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let created = Admin {
            id: Uuid::new_v4(),
            email: admin.email,
            name: admin.name,
            image: admin.image,
            role: admin.role,
            created_at: now,
            updated_at: now,
        };
        admins.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Admin>> {
        Ok(self.admins.read().await.iter().find(|a| a.id == *id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Paginated<Admin>> {
        let mut admins = self.admins.read().await.clone();
        admins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Paginated::from_slice(&admins, page))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut admins = self.admins.write().await;
        let before = admins.len();
        admins.retain(|a| a.id != *id);
        Ok(admins.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(email: &str, name: &str) -> AdminUpsert {
        AdminUpsert {
            email: email.to_string(),
            name: name.to_string(),
            image: String::new(),
            role: "manager".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_is_keyed_by_email() {
        let store = MemoryAdminStore::new();
        let first = store.upsert(upsert("ada@example.com", "Ada")).await.unwrap();
        let second = store
            .upsert(upsert("ada@example.com", "Ada Lovelace"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Ada Lovelace");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = MemoryAdminStore::new();
        let admin = store.upsert(upsert("ada@example.com", "Ada")).await.unwrap();
        assert!(store.delete(&admin.id).await.unwrap());
        assert!(!store.delete(&admin.id).await.unwrap());
        assert!(store.find_by_id(&admin.id).await.unwrap().is_none());
    }
}
