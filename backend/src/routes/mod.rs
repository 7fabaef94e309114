//! Route definitions for the StockLink API
//!
//! Reads are public. Writes pass through [`auth_middleware`]; deletes also
//! pass through [`require_admin`]. Routers sharing a path are merged so each
//! method keeps its own gate.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, require_admin},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(health_routes())
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/db", get(handlers::database_health))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route("/movements", get(handlers::list_movements))
        .route("/warehouses", get(handlers::list_warehouses))
        .route("/warehouses/:id", get(handlers::get_warehouse))
        .route("/warehouses/:id/locations", get(handlers::get_location))
        .route(
            "/warehouses/:id/locations/bins/:bin_code",
            get(handlers::get_bin),
        )
        .route("/locations/:bin_code/exists", get(handlers::bin_exists))
}

/// Any authenticated user
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/products", post(handlers::create_product))
        .route("/products/:id", put(handlers::update_product))
        .route("/movements", post(handlers::create_movement))
        .route("/warehouses", post(handlers::create_warehouse))
        .route("/warehouses/:id", put(handlers::update_warehouse))
        .route(
            "/warehouses/:id/locations",
            post(handlers::create_location).put(handlers::replace_location),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Authenticated admins only
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/products/:id", delete(handlers::delete_product))
        .route("/warehouses/:id", delete(handlers::delete_warehouse))
        // Layers run outermost-last: authentication before the role check
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
