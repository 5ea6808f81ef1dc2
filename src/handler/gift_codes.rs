// handler/gift_codes.rs
use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::{admindtos::*, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn gift_codes_handler() -> Router {
    Router::new().route("/redeem", post(redeem_gift_code))
}

pub async fn redeem_gift_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<RedeemGiftCodeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (gift_code, _amount) = app_state
        .gift_code_service
        .redeem(&auth.user, &body.code)
        .await?;

    let response: GiftCodeResponseDto = gift_code.into();
    Ok(Json(ApiResponse::success("Gift code redeemed", response)))
}
