// handler/users.rs
use std::sync::Arc;

use axum::{
    extract::Query,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    service::referral::generate_referral_link,
    utils::password,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/referral-link", get(get_referral_link))
        .route("/referral-stats", get(get_referral_stats))
        .route("/withdrawal-pin", put(set_withdrawal_pin))
        .route("/withdrawal-pin/verify", post(verify_withdrawal_pin))
        .route(
            "/admin/users",
            get(get_users_admin).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::SuperAdmin])
            })),
        )
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&auth.user);

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    }))
}

pub async fn get_referral_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let referral_code = auth
        .user
        .referral_code
        .clone()
        .ok_or_else(|| HttpError::not_found("No referral code on this account"))?;

    let referral_link = generate_referral_link(&app_state.env.app_url, &referral_code);

    Ok(Json(ReferralLinkResponseDto {
        referral_code,
        referral_link,
    }))
}

pub async fn get_referral_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .db_client
        .get_referral_stats(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: ReferralStatsResponseDto = stats.into();
    Ok(Json(response))
}

pub async fn set_withdrawal_pin(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SetWithdrawalPinDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.has_withdrawal_pin() {
        return Err(HttpError::bad_request(
            "Withdrawal PIN is already set. Contact support to reset it.",
        ));
    }

    let pin_hash =
        password::hash(&body.pin).map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .set_withdrawal_pin_hash(auth.user.id, &pin_hash)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(Response {
        status: "success",
        message: "Withdrawal PIN set".to_string(),
    }))
}

pub async fn verify_withdrawal_pin(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SetWithdrawalPinDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let pin_hash = auth
        .user
        .withdrawal_pin_hash
        .as_deref()
        .ok_or_else(|| HttpError::bad_request("Withdrawal PIN has not been set"))?;

    let matched = password::compare(&body.pin, pin_hash)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !matched {
        return Err(HttpError::bad_request("Withdrawal PIN is incorrect"));
    }

    Ok(Json(Response {
        status: "success",
        message: "PIN verified".to_string(),
    }))
}

pub async fn get_users_admin(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_users(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user_count = app_state
        .db_client
        .get_user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: users.iter().map(FilterUserDto::filter_user).collect(),
        results: user_count,
    }))
}
