use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::admin::Admin;
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::user::{User, UserStatus};
use crate::repositories::{admin::AdminStore, user::UserStore};

pub const ADMINS_REVALIDATE: &str = "/admins";
pub const USERS_REVALIDATE: &str = "/users";

/// Parses an id taken from a path or form field.
fn parse_id(kind: &str, raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(format!("{} ID is required", kind)));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {} ID", kind)))
}

pub async fn list_admins(admins: &dyn AdminStore, page: PageRequest) -> Result<Paginated<Admin>> {
    admins.list(page.normalized()).await
}

pub async fn delete_admin(admins: &dyn AdminStore, raw_id: &str) -> Result<()> {
    let id = parse_id("Admin", raw_id)?;
    if !admins.delete(&id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("🗑️ Admin deleted: {}", id);
    Ok(())
}

pub async fn list_users(users: &dyn UserStore, page: PageRequest) -> Result<Paginated<User>> {
    users.list(page.normalized()).await
}

pub async fn delete_user(users: &dyn UserStore, raw_id: &str) -> Result<()> {
    let id = parse_id("User", raw_id)?;
    if !users.delete(&id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("🗑️ User deleted: {}", id);
    Ok(())
}

/// Flips a user between `banned` and `allow`, starting from the status the
/// dashboard last displayed.
pub async fn toggle_ban(users: &dyn UserStore, raw_id: &str, current: UserStatus) -> Result<User> {
    let id = parse_id("User", raw_id)?;
    let user = users.set_status(&id, current.toggled()).await?;
    tracing::info!("✅ User {} is now {}", id, user.status.as_str());
    Ok(user)
}
