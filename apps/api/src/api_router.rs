use std::time::Duration;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use warden_core::AppError;

use crate::handlers::{access_control, broker_links, health, password_reset};
use crate::middleware::{self, USER_ID_HEADER};
use crate::state::AppState;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    request_timeout: Duration,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/permissions",
            get(access_control::list_permissions_handler)
                .post(access_control::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(access_control::get_permission_handler)
                .put(access_control::update_permission_handler)
                .delete(access_control::delete_permission_handler),
        )
        .route(
            "/api/roles",
            get(access_control::list_roles_handler).post(access_control::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(access_control::get_role_handler)
                .put(access_control::update_role_handler)
                .delete(access_control::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(access_control::list_role_permissions_handler)
                .put(access_control::set_role_permissions_handler),
        )
        .route(
            "/api/roles/{role_id}/users",
            get(access_control::list_role_users_handler)
                .post(access_control::add_role_users_handler),
        )
        .route(
            "/api/roles/{role_id}/users/removals",
            post(access_control::remove_role_users_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            get(access_control::list_user_roles_handler)
                .put(access_control::set_user_roles_handler),
        )
        .route(
            "/api/users/{user_id}/brokers/{broker_id}",
            delete(broker_links::delete_broker_link_handler),
        )
        .route_layer(from_fn(middleware::require_principal));

    let public_routes = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/password-resets",
            post(password_reset::request_password_reset_handler),
        )
        .route(
            "/api/password-resets/{request_id}/verify",
            post(password_reset::verify_password_reset_handler),
        )
        .route(
            "/api/password-resets/{request_id}/complete",
            post(password_reset::complete_password_reset_handler),
        );

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            request_timeout,
        ))
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]))
}
