// HTTP routes

mod chat;
mod error;
mod http;

use std::sync::Arc;

use axum::http::{HeaderValue, header};
use axum::{Router, routing::get, routing::post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::aggregator::Aggregator;
use crate::aws_repo::AwsRepo;
use crate::chat::PersonaChat;
use crate::config::AppConfig;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aws: Arc<AwsRepo>,
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) chat: Arc<PersonaChat>,
    pub(crate) config: AppConfig,
}

pub fn app(
    aws: Arc<AwsRepo>,
    aggregator: Arc<Aggregator>,
    chat: Arc<PersonaChat>,
    config: AppConfig,
) -> Router {
    let cache_control = HeaderValue::from_str(&format!(
        "public, max-age={}",
        config.cache.max_age_secs
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=30"));

    let state = AppState {
        aws,
        aggregator,
        chat,
        config,
    };

    // Read-only GETs are client-cacheable; /health opts out below.
    let cacheable = Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/instances", get(http::instances_handler)) // GET /instances
        .route("/alb", get(http::alb_handler)) // GET /alb
        .route("/costs", get(http::costs_handler)) // GET /costs?days=N
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            cache_control,
        ));

    Router::new()
        .route("/", get(|| async { "awspulse: AWS resource metrics API" })) // GET /
        .route("/health", get(http::health_handler)) // GET /health
        .route("/chat", post(chat::chat_handler)) // POST /chat (form)
        .route("/talk", post(chat::talk_handler)) // POST /talk (json)
        .merge(cacheable)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
