//! API routes for owner-cloud
//!
//! Everything is served under `/api/v1`. Owner routes require a Bearer JWT
//! with the `owner` role; `GET /restaurants/{id}`, a restaurant's public
//! menu, `/health` and the live WebSocket (token in the query string) are
//! public.

pub mod category;
pub mod extract;
pub mod health;
pub mod live_ws;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::owner_auth_middleware;
use crate::state::AppState;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the full router
pub fn create_router(state: AppState, client_url: &str) -> Router {
    let owner_auth = middleware::from_fn_with_state(state.clone(), owner_auth_middleware);
    let upload_limit = state.max_file_size + MULTIPART_OVERHEAD;

    let owner = Router::new()
        .route("/restaurants", post(restaurant::create))
        .route("/restaurants/my-restaurants", get(restaurant::list_mine))
        .route(
            "/restaurants/{id}/submit-verification",
            put(restaurant::submit_verification),
        )
        .route("/restaurants/{id}/reset-override", put(restaurant::reset_override))
        .route("/menu", post(menu::create_item).get(menu::list_mine))
        .route("/menu/{id}", put(menu::update_item).delete(menu::delete_item))
        .route(
            "/menu/{id}/assign-restaurants",
            put(menu::assign_restaurants),
        )
        .route(
            "/menu/categories",
            post(category::create).get(category::list_mine),
        )
        .route(
            "/menu/categories/{id}",
            put(category::update).delete(category::delete),
        )
        .route("/orders/my-orders", get(order::list_mine))
        .route("/orders/{id}/status", put(order::update_status))
        .route("/reviews/my-reviews", get(order::list_my_reviews))
        .route(
            "/upload",
            post(upload::upload_file)
                .delete(upload::delete_file)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(owner_auth.clone());

    // GET is public, PUT / DELETE need the owner
    let restaurant_by_id = get(restaurant::get_one).merge(
        put(restaurant::update)
            .delete(restaurant::delete)
            .layer(owner_auth),
    );

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/restaurants/{id}", restaurant_by_id)
        .route("/menu/restaurant/{restaurant_id}", get(menu::restaurant_menu))
        .route("/live/ws", get(live_ws::handle_live_ws))
        .merge(owner);

    Router::new()
        .nest("/api/v1", api)
        .layer(cors_layer(client_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(client_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(client_url = %client_url, "Invalid CLIENT_URL, allowing any origin");
            AllowOrigin::any()
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
