// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, gift_codes::gift_codes_handler,
        investments::investments_handler, notifications::notifications_handler,
        packages::packages_handler, users::users_handler, wallet::wallet_handler,
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/packages",
            packages_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/investments",
            investments_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/wallet", wallet_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/gift-codes",
            gift_codes_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/notifications",
            notifications_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/admin",
            admin_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
