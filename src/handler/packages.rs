// handler/packages.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::packagedb::PackageExt,
    dtos::{packagedtos::*, ApiResponse},
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    utils::currency::kes_to_cents,
    AppState,
};

pub fn packages_handler() -> Router {
    Router::new()
        .route("/", get(get_packages))
        .route(
            "/",
            post(create_package).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
        .route(
            "/all",
            get(get_packages_admin).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
        .route(
            "/:package_id",
            put(update_package).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
        .route(
            "/:package_id",
            delete(deactivate_package).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
}

/// Active catalog shown to investors.
pub async fn get_packages(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let packages = app_state
        .db_client
        .get_packages(false)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<PackageResponseDto> = packages.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Packages retrieved", response)))
}

pub async fn get_packages_admin(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let packages = app_state
        .db_client
        .get_packages(true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<PackageAdminResponseDto> = packages.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Packages retrieved", response)))
}

pub async fn create_package(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreatePackageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let package = app_state
        .db_client
        .create_package(
            body.name,
            kes_to_cents(body.price),
            body.duration_days,
            body.roi_percent,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: PackageAdminResponseDto = package.into();
    Ok(Json(ApiResponse::success("Package created", response)))
}

pub async fn update_package(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(package_id): Path<Uuid>,
    Json(body): Json<UpdatePackageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_package(package_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_none() {
        return Err(HttpError::not_found("Package not found"));
    }

    let package = app_state
        .db_client
        .update_package(
            package_id,
            body.name,
            body.price.map(kes_to_cents),
            body.duration_days,
            body.roi_percent,
            body.status,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: PackageAdminResponseDto = package.into();
    Ok(Json(ApiResponse::success("Package updated", response)))
}

pub async fn deactivate_package(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(package_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let existing = app_state
        .db_client
        .get_package(package_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_none() {
        return Err(HttpError::not_found("Package not found"));
    }

    let package = app_state
        .db_client
        .deactivate_package(package_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: PackageAdminResponseDto = package.into();
    Ok(Json(ApiResponse::success("Package deactivated", response)))
}
