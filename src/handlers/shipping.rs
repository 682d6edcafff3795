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
        session::AuthContext,
        shipping::{Shipping, ShippingForm},
    },
    services::shipping,
    state::AppState,
};

pub async fn list_shipping(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<Shipping>>> {
    Ok(Json(shipping::list(&state.api, &ctx, page).await?))
}

pub async fn get_shipping(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Shipping>> {
    Ok(Json(shipping::get(&state.api, &ctx, id).await?))
}

pub async fn get_shipping_by_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(order_id): Path<i64>,
) -> Result<Json<Shipping>> {
    Ok(Json(shipping::get_by_order(&state.api, &ctx, order_id).await?))
}

pub async fn create_shipping(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<ShippingForm>,
) -> Response {
    respond(
        shipping::REVALIDATE,
        shipping::create(&state.api, &ctx, &form).await,
    )
}

pub async fn update_shipping(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<ShippingForm>,
) -> Response {
    respond(
        shipping::REVALIDATE,
        shipping::update(&state.api, &ctx, id, &form).await,
    )
}

pub async fn delete_shipping(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    respond(
        shipping::REVALIDATE,
        shipping::delete(&state.api, &ctx, id).await,
    )
}
