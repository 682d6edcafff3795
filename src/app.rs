use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use http::{header, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    handlers,
    middleware_layer::auth::{load_session, require_auth},
    state::AppState,
};

/// Largest request body accepted from the dashboard.
const BODY_LIMIT: usize = 1024 * 1024;

/// Builds the full HTTP surface.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`:
/// the rate limiter keys on the peer address.
pub fn router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state
        .config
        .allowed_origin
        .parse()
        .map_err(|_| AppError::Configuration("Invalid ALLOWED_ORIGIN".to_string()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(100)
            .burst_size(200)
            .use_headers()
            .finish()
            .ok_or_else(|| AppError::Configuration("Invalid rate limit settings".to_string()))?,
    );

    let public_routes = Router::new()
        .route("/api/auth/signin", get(handlers::auth::signin))
        .route("/api/auth/callback", get(handlers::auth::callback))
        .route("/api/auth-test", get(handlers::auth::auth_test))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/api/auth/signout", post(handlers::auth::signout))
        .route("/api/auth/session", get(handlers::auth::session))
        .route(
            "/api/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route(
            "/api/products/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        .route(
            "/api/brands",
            get(handlers::catalog::list_brands).post(handlers::catalog::create_brand),
        )
        .route(
            "/api/brands/{id}",
            put(handlers::catalog::update_brand).delete(handlers::catalog::delete_brand),
        )
        .route(
            "/api/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route(
            "/api/categories/{id}",
            put(handlers::catalog::update_category).delete(handlers::catalog::delete_category),
        )
        .route(
            "/api/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route(
            "/api/product-orders",
            post(handlers::orders::add_product_to_order),
        )
        .route(
            "/api/product-orders/{id}",
            delete(handlers::orders::remove_product_from_order),
        )
        .route("/api/checkout", post(handlers::orders::checkout))
        .route(
            "/api/shipping",
            get(handlers::shipping::list_shipping).post(handlers::shipping::create_shipping),
        )
        .route(
            "/api/shipping/{id}",
            get(handlers::shipping::get_shipping)
                .put(handlers::shipping::update_shipping)
                .delete(handlers::shipping::delete_shipping),
        )
        .route(
            "/api/shipping/order/{order_id}",
            get(handlers::shipping::get_shipping_by_order),
        )
        .route(
            "/api/repairs",
            get(handlers::repairs::list_repairs).post(handlers::repairs::create_repair),
        )
        .route(
            "/api/repairs/{id}",
            get(handlers::repairs::get_repair)
                .put(handlers::repairs::update_repair)
                .delete(handlers::repairs::delete_repair),
        )
        .route(
            "/api/repair-statuses",
            post(handlers::repairs::add_repair_status),
        )
        .route(
            "/api/repair-statuses/{id}",
            put(handlers::repairs::update_repair_status),
        )
        .route_layer(from_fn_with_state(state.clone(), load_session))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/admins", get(handlers::accounts::list_admins))
        .route("/api/admins/{id}", delete(handlers::accounts::delete_admin))
        .route("/api/users", get(handlers::accounts::list_users))
        .route("/api/users/{id}", delete(handlers::accounts::delete_user))
        .route("/api/users/{id}/ban", post(handlers::accounts::toggle_ban))
        .route_layer(from_fn(require_auth))
        .route_layer(from_fn_with_state(state.clone(), load_session))
        .with_state(state);

    Ok(Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(GovernorLayer::new(governor_conf))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .map_response(|res: http::Response<_>| res.map(axum::body::Body::new))
                .layer(DefaultBodyLimit::max(BODY_LIMIT))
                .layer(CompressionLayer::new())
                .layer(CookieManagerLayer::new())
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(false))
                        .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                        .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
                ),
        ))
}
