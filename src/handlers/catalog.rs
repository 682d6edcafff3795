use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};

use crate::{
    error::Result,
    models::{
        catalog::{NameForm, NamedRecord, Product, ProductForm},
        outcome::respond,
        pagination::{PageRequest, Paginated},
        session::AuthContext,
    },
    services::{products, taxonomy::Taxonomy},
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<Product>>> {
    Ok(Json(products::list(&state.api, &ctx, page).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    Ok(Json(products::get(&state.api, &ctx, id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<ProductForm>,
) -> Response {
    respond(
        products::REVALIDATE,
        products::create(&state.api, &ctx, &form).await,
    )
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<ProductForm>,
) -> Response {
    respond(
        products::REVALIDATE,
        products::update(&state.api, &ctx, id, &form).await,
    )
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    respond(
        products::REVALIDATE,
        products::delete(&state.api, &ctx, id).await,
    )
}

async fn list_named(
    taxonomy: Taxonomy,
    state: AppState,
    ctx: AuthContext,
    page: PageRequest,
) -> Result<Json<Paginated<NamedRecord>>> {
    Ok(Json(taxonomy.list(&state.api, &ctx, page).await?))
}

pub async fn list_brands(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<NamedRecord>>> {
    list_named(Taxonomy::Brands, state, ctx, page).await
}

pub async fn create_brand(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<NameForm>,
) -> Response {
    let taxonomy = Taxonomy::Brands;
    respond(
        taxonomy.revalidate(),
        taxonomy.create(&state.api, &ctx, &form.name).await,
    )
}

pub async fn update_brand(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<NameForm>,
) -> Response {
    let taxonomy = Taxonomy::Brands;
    respond(
        taxonomy.revalidate(),
        taxonomy.update(&state.api, &ctx, id, &form.name).await,
    )
}

pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    let taxonomy = Taxonomy::Brands;
    respond(
        taxonomy.revalidate(),
        taxonomy.delete(&state.api, &ctx, id).await,
    )
}

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Paginated<NamedRecord>>> {
    list_named(Taxonomy::Categories, state, ctx, page).await
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(form): Json<NameForm>,
) -> Response {
    let taxonomy = Taxonomy::Categories;
    respond(
        taxonomy.revalidate(),
        taxonomy.create(&state.api, &ctx, &form.name).await,
    )
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(form): Json<NameForm>,
) -> Response {
    let taxonomy = Taxonomy::Categories;
    respond(
        taxonomy.revalidate(),
        taxonomy.update(&state.api, &ctx, id, &form.name).await,
    )
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Response {
    let taxonomy = Taxonomy::Categories;
    respond(
        taxonomy.revalidate(),
        taxonomy.delete(&state.api, &ctx, id).await,
    )
}
