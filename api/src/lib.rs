//! Discussion forum backend: threads, comments, nested replies and comment
//! likes, served over a JSON HTTP API.

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod forum;
pub mod identity;
pub mod json;
pub mod schema;

use forum::repository::Repositories;

#[derive(Clone)]
pub struct App {
    pub repos: Repositories,
}

pub fn router(app: App) -> Router {
    Router::new()
        .nest("/threads", forum::routes::route())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app)
}
