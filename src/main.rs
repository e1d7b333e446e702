mod config;
mod db;
mod error;
mod models;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, db::Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinedex=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let database = db::connect(&config.mongodb_url, &config.mongodb_database).await?;
    let store = Store::new(&database);

    let state = Arc::new(AppState { config: config.clone(), store });

    // Wide-open policy with credentials; Any cannot be combined with
    // allow_credentials, so the origin is mirrored instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/cinema", get(routes::list_movies).post(routes::create_movie))
        .route("/cinema/{movie_id}", put(routes::update_movie).delete(routes::delete_movie))
        .route("/search/movie", get(routes::search_movies))
        .route("/feedback", post(routes::submit_feedback))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
