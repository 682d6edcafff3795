use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};

use crate::{
    error::Result,
    models::{
        order::{CheckoutRequest, Order, OrderForm, ProductOrderForm},
        outcome::respond,
        pagination::{PageRequest, Paginated},
        session::AuthContext,
    },
    services::orders,
    state::AppState,
};

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<Order>>> {
    Ok(Json(orders::list(&state.api, &ctx, page).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    Ok(Json(orders::get(&state.api, &ctx, id).await?))
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<OrderForm>,
) -> Response {
    respond(orders::REVALIDATE, orders::create(&state.api, &ctx, &form).await)
}

pub async fn update_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<OrderForm>,
) -> Response {
    respond(
        orders::REVALIDATE,
        orders::update(&state.api, &ctx, id, &form).await,
    )
}

pub async fn delete_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    respond(orders::REVALIDATE, orders::delete(&state.api, &ctx, id).await)
}

pub async fn add_product_to_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<ProductOrderForm>,
) -> Response {
    respond(
        orders::REVALIDATE,
        orders::add_product(&state.api, &ctx, &form).await,
    )
}

pub async fn remove_product_from_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    respond(
        orders::REVALIDATE,
        orders::remove_product(&state.api, &ctx, id).await,
    )
}

/// Returns the backend's checkout answer as-is.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<sonic_rs::Value>> {
    Ok(Json(orders::checkout(&state.api, &ctx, &request).await?))
}
