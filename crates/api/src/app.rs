use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::ChatGateway;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, require_webhook_secret, trace_id,
};
use crate::routes::{auth, dashboard, forms, health, public, telegram, users};
use crate::services::auth::jwt_config_from;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    /// Outbound chat. `None` when Telegram is disabled.
    pub gateway: Option<Arc<dyn ChatGateway>>,
}

impl AppState {
    /// Builds state from config, decoding the JWT keys once.
    pub fn new(
        config: Config,
        pool: PgPool,
        gateway: Option<Arc<dyn ChatGateway>>,
    ) -> Result<Self, JwtError> {
        let jwt = jwt_config_from(&config.jwt)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            gateway,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Owner-scoped routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(users::get_current_user))
        .route(
            "/api/v1/users/me/telegram-link",
            post(users::create_telegram_link),
        )
        .route(
            "/api/v1/forms",
            get(forms::list_forms).post(forms::create_form),
        )
        .route(
            "/api/v1/forms/:form_id",
            get(forms::get_form)
                .put(forms::update_form)
                .delete(forms::delete_form),
        )
        .route(
            "/api/v1/forms/:form_id/submissions",
            get(forms::list_submissions),
        )
        .route(
            "/api/v1/forms/:form_id/export",
            get(forms::export_submissions),
        )
        .route("/api/v1/dashboard/stats", get(dashboard::get_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Telegram calls back here; authenticated by the shared secret header
    let webhook_routes = Router::new()
        .route("/api/v1/telegram/webhook", post(telegram::webhook))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_webhook_secret,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/public/forms/:form_id", get(public::get_public_form))
        .route(
            "/api/v1/public/forms/:form_id/submissions",
            post(public::submit_form),
        )
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(webhook_routes)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
