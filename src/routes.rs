use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_admin;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(admin_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(public::items_get))
        .route("/item/:id", get(public::item_get))
        .route("/login", post(public::login_post))
        .route("/feedback", post(public::feedback_post))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/items/add", post(protected::items_add_post))
        .route("/items/update", put(protected::items_update_put))
        .route("/items/:id", delete(protected::item_delete))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_permissive {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Minna Style Hub API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "items": "GET /items?page=&limit= (public)",
            "item": "GET /item/:id (public)",
            "login": "POST /login (public)",
            "feedback": "POST /feedback (public)",
            "add": "POST /items/add (admin token)",
            "update": "PUT /items/update (admin token)",
            "delete": "DELETE /items/:id (admin token)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.catalog.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "store": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "store": "unavailable" })),
            )
        }
    }
}
