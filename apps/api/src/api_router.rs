use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};


pub fn build_router(app_state: AppState) -> Router {
    let login_routes = Router::new()
        .route("/v1/auth/login", post(handlers::auth::login_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_remote_address,
        ));

    let admin_routes = Router::new()
        .route("/v1/auth/renew", post(handlers::auth::renew_handler))
        .route("/v1/role", get(handlers::roles::list_roles_handler))
        .route("/v1/roles", get(handlers::roles::list_roles_handler))
        .route(
            "/v1/role/{name}",
            get(handlers::roles::read_role_handler)
                .post(handlers::roles::create_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/v1/config/client",
            get(handlers::client_config::read_client_config_handler)
                .post(handlers::client_config::create_client_config_handler)
                .put(handlers::client_config::update_client_config_handler)
                .delete(handlers::client_config::delete_client_config_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin_token,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(login_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
