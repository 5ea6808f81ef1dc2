// handler/investments.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::subscriptiondb::SubscriptionExt,
    dtos::{investmentdtos::*, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::subscriptionmodels::PaymentMethod,
    utils::currency::cents_to_kes,
    AppState,
};

pub fn investments_handler() -> Router {
    Router::new()
        .route("/", get(get_my_subscriptions))
        .route("/purchase", post(purchase_package))
        .route("/:subscription_id", get(get_subscription))
        .route("/:subscription_id/payment", post(submit_payment))
        .route("/:subscription_id/claim", post(claim_daily_yield))
}

pub async fn purchase_package(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<PurchasePackageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    match body.payment_method {
        PaymentMethod::Wallet => {
            let subscription = app_state
                .investment_service
                .purchase_with_wallet(&auth.user, body.package_id)
                .await?;

            let response: SubscriptionResponseDto = subscription.into();
            Ok(Json(ApiResponse::success("Investment activated", response)).into_response())
        }
        PaymentMethod::Mpesa => {
            let subscription = app_state
                .investment_service
                .begin_mpesa_purchase(&auth.user, body.package_id)
                .await?;

            let amount = cents_to_kes(subscription.package_price);
            let expires_at = subscription.expires_at;
            let response = MpesaInstructionsDto {
                subscription: subscription.into(),
                till_number: app_state.env.mpesa_till_number.clone(),
                amount,
                expires_at,
            };
            Ok(Json(ApiResponse::success(
                "Send the amount to the till number, then submit your confirmation message",
                response,
            ))
            .into_response())
        }
    }
}

pub async fn submit_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(subscription_id): Path<Uuid>,
    Json(body): Json<SubmitPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let subscription = app_state
        .investment_service
        .submit_payment_message(&auth.user, subscription_id, body.mpesa_message)
        .await?;

    let response: SubscriptionResponseDto = subscription.into();
    Ok(Json(ApiResponse::success(
        "Payment submitted for verification",
        response,
    )))
}

pub async fn get_my_subscriptions(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let subscriptions = app_state
        .db_client
        .get_user_subscriptions(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<SubscriptionResponseDto> =
        subscriptions.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Investments retrieved", response)))
}

pub async fn get_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let subscription = app_state
        .db_client
        .get_subscription(subscription_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Investment not found"))?;

    if subscription.user_id != auth.user.id && !auth.user.is_admin() {
        return Err(HttpError::not_found("Investment not found"));
    }

    let response: SubscriptionResponseDto = subscription.into();
    Ok(Json(ApiResponse::success("Investment retrieved", response)))
}

pub async fn claim_daily_yield(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (claim, amount) = app_state
        .investment_service
        .claim_daily_yield(&auth.user, subscription_id)
        .await?;

    let response = ClaimResponseDto {
        subscription_id: claim.subscription_id,
        claim_date: claim.claim_date,
        amount: cents_to_kes(amount),
    };

    Ok(Json(ApiResponse::success("Daily yield claimed", response)))
}
