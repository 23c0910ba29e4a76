pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod shutdown;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::state::AppState;

/// Full application router: every route, the authorization gate and the
/// global layers.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(session_routes())
        .merge(user_routes())
        .merge(car_routes())
        .merge(customer_routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::authorization_gate,
        ))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security));

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn session_routes() -> Router<AppState> {
    use handlers::session;

    Router::new()
        .route("/users/login", post(session::login))
        .route("/users/me", get(session::me))
        .route("/users/logout", post(session::logout))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", get(users::retrieve_all).post(users::create))
        .route(
            "/users/:id",
            get(users::retrieve_one)
                .put(users::update)
                .delete(users::delete),
        )
}

fn car_routes() -> Router<AppState> {
    use handlers::cars;

    Router::new()
        .route("/cars", get(cars::retrieve_all).post(cars::create))
        .route(
            "/cars/:id",
            get(cars::retrieve_one)
                .put(cars::update)
                .delete(cars::delete),
        )
}

fn customer_routes() -> Router<AppState> {
    use handlers::customers;

    Router::new()
        .route(
            "/customers",
            get(customers::retrieve_all).post(customers::create),
        )
        .route(
            "/customers/:id",
            get(customers::retrieve_one)
                .put(customers::update)
                .delete(customers::delete),
        )
}

/// `*` allows any origin without credentials; anything else is an explicit
/// origin list with cookies allowed.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
