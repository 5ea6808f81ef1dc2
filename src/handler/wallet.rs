// handler/wallet.rs
use std::sync::Arc;

use axum::{
    extract::Query, response::IntoResponse, routing::get, Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{requestdb::RequestExt, walletdb::WalletExt},
    dtos::{walletdtos::*, ApiResponse},
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    utils::currency::kes_to_cents,
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new()
        .route("/", get(get_wallet))
        .route("/overview", get(get_wallet_overview))
        .route("/transactions", get(get_transaction_history))
        .route("/deposits", get(get_my_deposits).post(request_deposit))
        .route("/withdrawals", get(get_my_withdrawals).post(request_withdrawal))
}

pub async fn get_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let wallet = app_state
        .db_client
        .get_wallet(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::WalletNotFound.to_string()))?;

    let response: WalletResponseDto = wallet.into();
    Ok(Json(ApiResponse::success("Wallet retrieved", response)))
}

pub async fn get_wallet_overview(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let overview = app_state
        .db_client
        .get_wallet_overview(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: WalletOverviewDto = overview.into();
    Ok(Json(ApiResponse::success("Wallet overview retrieved", response)))
}

pub async fn get_transaction_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<EntryHistoryQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let entries = app_state
        .db_client
        .get_wallet_entries(
            auth.user.id,
            query.entry_type,
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<EntryResponseDto> = entries.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Transactions retrieved", response)))
}

pub async fn request_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<DepositRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .deposit_service
        .request_deposit(
            &auth.user,
            kes_to_cents(body.amount),
            body.phone_number,
            body.mpesa_message,
        )
        .await?;

    let response: DepositRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success(
        "Deposit submitted for verification",
        response,
    )))
}

pub async fn get_my_deposits(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .db_client
        .get_user_deposit_requests(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<DepositRequestResponseDto> = requests.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Deposits retrieved", response)))
}

pub async fn request_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<WithdrawalRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .withdrawal_service
        .request_withdrawal(
            &auth.user,
            kes_to_cents(body.amount),
            body.phone_number,
            &body.pin,
        )
        .await?;

    let response: WithdrawalRequestResponseDto = request.into();
    Ok(Json(ApiResponse::success(
        "Withdrawal request submitted",
        response,
    )))
}

pub async fn get_my_withdrawals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .db_client
        .get_user_withdrawal_requests(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<WithdrawalRequestResponseDto> =
        requests.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Withdrawals retrieved", response)))
}
