use async_trait::async_trait;
use deadpool_postgres::Pool;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        pagination::{PageRequest, Paginated},
        user::{User, UserStatus},
    },
};

/// Persistence for storefront users managed from the dashboard.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Lists users, newest first.
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>>;

    /// Deletes a user. Returns whether a row was removed.
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Sets a user's status and returns the updated user.
    async fn set_status(&self, id: &Uuid, status: UserStatus) -> Result<User>;
}

/// The PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>> {
        let page = page.normalized();
        let client = self.pool.get().await?;

        let count_row = client.query_one("SELECT COUNT(*) AS total FROM users", &[]).await?;
        let total: i64 = count_row.get("total");

        let statement = client
            .prepare_cached(
                r#"
                SELECT id, name, email, image, status, created_at
                FROM users
                ORDER BY created_at DESC, id
                LIMIT $1 OFFSET $2
                "#,
            )
            .await?;
        let rows = client
            .query(&statement, &[&(page.limit as i64), &(page.offset() as i64)])
            .await?;

        Ok(Paginated {
            data: rows.iter().map(User::from).collect(),
            count: total.max(0) as u64,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let removed = client.execute("DELETE FROM users WHERE id = $1", &[id]).await?;
        Ok(removed > 0)
    }

    async fn set_status(&self, id: &Uuid, status: UserStatus) -> Result<User> {
        let client = self.pool.get().await?;
        let statement = client
            .prepare_cached(
                r#"
                UPDATE users
                SET status = $1
                WHERE id = $2
                RETURNING id, name, email, image, status, created_at
                "#,
            )
            .await?;
        let row = client
            .query_opt(&statement, &[&status.as_str(), id])
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(User::from(&row))
    }
}

/// An in-process store, used by tests and local runs without PostgreSQL.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Paginated::from_slice(&users, page))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != *id);
        Ok(users.len() < before)
    }

    async fn set_status(&self, id: &Uuid, status: UserStatus) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or(AppError::NotFound)?;
        user.status = status;
        Ok(user.clone())
    }
}
