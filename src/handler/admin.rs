// handler/admin.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        giftcodedb::GiftCodeExt,
        notificationdb::NotificationExt,
        requestdb::RequestExt,
        subscriptiondb::SubscriptionExt,
        userdb::UserExt,
        walletdb::WalletExt,
    },
    dtos::{
        admindtos::*,
        investmentdtos::SubscriptionResponseDto,
        userdtos::RequestQueryDto,
        walletdtos::{DepositRequestResponseDto, EntryResponseDto, WithdrawalRequestResponseDto},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::{
        requestmodels::RequestStatus,
        subscriptionmodels::SubscriptionStatus,
        walletmodels::{generate_entry_reference, EntryType},
    },
    utils::currency::kes_to_cents,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/subscriptions/pending", get(get_pending_subscriptions))
        .route("/subscriptions/:subscription_id/approve", put(approve_subscription))
        .route("/subscriptions/:subscription_id/reject", put(reject_subscription))
        .route("/deposits/pending", get(get_pending_deposits))
        .route("/deposits/:request_id/approve", put(approve_deposit))
        .route("/deposits/:request_id/reject", put(reject_deposit))
        .route("/withdrawals/pending", get(get_pending_withdrawals))
        .route("/withdrawals/:request_id/approve", put(approve_withdrawal))
        .route("/withdrawals/:request_id/reject", put(reject_withdrawal))
        .route("/gift-codes", get(get_gift_codes).post(create_gift_code))
        .route("/gift-codes/:gift_code_id/deactivate", put(deactivate_gift_code))
        .route("/wallets/:user_id/credit", post(credit_user_wallet))
        .route("/wallets/:user_id/debit", post(debit_user_wallet))
        .route("/notifications", get(get_admin_notifications))
}

// Subscription review

pub async fn get_pending_subscriptions(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let subscriptions = app_state
        .db_client
        .get_subscriptions_by_status(SubscriptionStatus::PendingApproval)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<SubscriptionResponseDto> =
        subscriptions.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Pending subscriptions retrieved", response)))
}

pub async fn approve_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(subscription_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let subscription = app_state
        .investment_service
        .approve_subscription(auth.user.id, subscription_id, body.note)
        .await?;

    let response: SubscriptionResponseDto = subscription.into();
    Ok(Json(ApiResponse::success("Subscription approved", response)))
}

pub async fn reject_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(subscription_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let subscription = app_state
        .investment_service
        .reject_subscription(auth.user.id, subscription_id, body.note)
        .await?;

    let response: SubscriptionResponseDto = subscription.into();
    Ok(Json(ApiResponse::success("Subscription rejected", response)))
}

// Deposit review

pub async fn get_pending_deposits(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .db_client
        .get_deposit_requests_by_status(RequestStatus::Pending)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<DepositRequestResponseDto> = requests.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Pending deposits retrieved", response)))
}

pub async fn approve_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .deposit_service
        .approve_deposit(auth.user.id, request_id, body.note)
        .await?;

    let response: DepositRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success("Deposit approved", response)))
}

pub async fn reject_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .deposit_service
        .reject_deposit(auth.user.id, request_id, body.note)
        .await?;

    let response: DepositRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success("Deposit rejected", response)))
}

// Withdrawal review

pub async fn get_pending_withdrawals(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .db_client
        .get_withdrawal_requests_by_status(RequestStatus::Pending)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<WithdrawalRequestResponseDto> =
        requests.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Pending withdrawals retrieved", response)))
}

pub async fn approve_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .withdrawal_service
        .approve_withdrawal(auth.user.id, request_id, body.note)
        .await?;

    let response: WithdrawalRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success("Withdrawal approved", response)))
}

pub async fn reject_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<ReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .withdrawal_service
        .reject_withdrawal(auth.user.id, request_id, body.note)
        .await?;

    let response: WithdrawalRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success("Withdrawal rejected", response)))
}

// Gift codes

pub async fn create_gift_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateGiftCodeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let gift_code = app_state
        .gift_code_service
        .create_gift_code(auth.user.id, kes_to_cents(body.amount), body.expires_at)
        .await?;

    let response: GiftCodeResponseDto = gift_code.into();
    Ok(Json(ApiResponse::success("Gift code created", response)))
}

pub async fn get_gift_codes(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = ((page - 1) * limit) as i64;

    let gift_codes = app_state
        .db_client
        .get_gift_codes(limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<GiftCodeResponseDto> = gift_codes.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Gift codes retrieved", response)))
}

pub async fn deactivate_gift_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(gift_code_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let gift_code = app_state
        .db_client
        .deactivate_gift_code(gift_code_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Gift code not found or already redeemed"))?;

    let response: GiftCodeResponseDto = gift_code.into();
    Ok(Json(ApiResponse::success("Gift code deactivated", response)))
}

// Manual wallet management

pub async fn credit_user_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AdminWalletAdjustDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let target = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNoLongerExist.to_string()))?;

    let entry = app_state
        .db_client
        .credit_wallet(
            target.id,
            kes_to_cents(body.amount),
            EntryType::AdminCredit,
            body.reason,
            generate_entry_reference(),
            None,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(
        "Admin {} credited wallet of user {} ({} cents)",
        auth.user.id,
        target.id,
        entry.amount
    );

    let response: EntryResponseDto = entry.into();
    Ok(Json(ApiResponse::success("Wallet credited", response)))
}

pub async fn debit_user_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AdminWalletAdjustDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let target = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNoLongerExist.to_string()))?;

    let entry = app_state
        .db_client
        .debit_wallet(
            target.id,
            kes_to_cents(body.amount),
            EntryType::AdminDebit,
            body.reason,
            generate_entry_reference(),
            None,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::payment_required(ErrorMessage::InsufficientBalance.to_string())
        })?;

    tracing::info!(
        "Admin {} debited wallet of user {} ({} cents)",
        auth.user.id,
        target.id,
        entry.amount
    );

    let response: EntryResponseDto = entry.into();
    Ok(Json(ApiResponse::success("Wallet debited", response)))
}

// Back-office notifications

pub async fn get_admin_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = ((page - 1) * limit) as i64;

    let notifications = app_state
        .db_client
        .get_admin_notifications(limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<AdminNotificationDto> =
        notifications.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Admin notifications retrieved", response)))
}
