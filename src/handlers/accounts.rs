use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::{
        admin::Admin,
        outcome::respond,
        pagination::{PageRequest, Paginated},
        user::{User, UserStatus},
    },
    services::accounts,
    state::AppState,
};

/// The status the dashboard showed when the ban button was pressed.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBanRequest {
    pub user_status: UserStatus,
}

pub async fn list_admins(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<Admin>>> {
    Ok(Json(accounts::list_admins(state.admins.as_ref(), page).await?))
}

pub async fn delete_admin(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(
        accounts::ADMINS_REVALIDATE,
        accounts::delete_admin(state.admins.as_ref(), &id).await,
    )
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<User>>> {
    Ok(Json(accounts::list_users(state.users.as_ref(), page).await?))
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(
        accounts::USERS_REVALIDATE,
        accounts::delete_user(state.users.as_ref(), &id).await,
    )
}

pub async fn toggle_ban(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ToggleBanRequest>,
) -> Response {
    respond(
        accounts::USERS_REVALIDATE,
        accounts::toggle_ban(state.users.as_ref(), &id, request.user_status).await,
    )
}
