// Library exports for sitecms
// Lets integration tests and embedders drive the editor and the server

pub mod client;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod routes;
pub mod sections;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: admin pages, JSON API, uploads, assets.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/assets/{*path}", get(routes::assets::serve))
        .merge(routes::admin::router())
        .merge(routes::api::router())
        .merge(routes::upload::router())
        .layer(TraceLayer::new_for_http())
        // The marketing frontend consumes the JSON API cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
