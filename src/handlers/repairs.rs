use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};

use crate::{
    error::Result,
    models::{
        outcome::respond,
        pagination::{PageRequest, Paginated},
        repair::{Repair, RepairForm, RepairStatusForm, RepairStatusUpdateForm},
        session::AuthContext,
    },
    services::repairs,
    state::AppState,
};

pub async fn list_repairs(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<Repair>>> {
    Ok(Json(repairs::list(&state.api, &ctx, page).await?))
}

pub async fn get_repair(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Repair>> {
    Ok(Json(repairs::get(&state.api, &ctx, id).await?))
}

pub async fn create_repair(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<RepairForm>,
) -> Response {
    respond(
        repairs::REVALIDATE,
        repairs::create(&state.api, &ctx, &form).await,
    )
}

pub async fn update_repair(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<RepairForm>,
) -> Response {
    respond(
        repairs::REVALIDATE,
        repairs::update(&state.api, &ctx, id, &form).await,
    )
}

pub async fn delete_repair(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    respond(
        repairs::REVALIDATE,
        repairs::delete(&state.api, &ctx, id).await,
    )
}

pub async fn add_repair_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<RepairStatusForm>,
) -> Response {
    respond(
        repairs::REVALIDATE,
        repairs::add_status(&state.api, &ctx, &form).await,
    )
}

pub async fn update_repair_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<RepairStatusUpdateForm>,
) -> Response {
    respond(
        repairs::REVALIDATE,
        repairs::update_status(&state.api, &ctx, id, &form).await,
    )
}
