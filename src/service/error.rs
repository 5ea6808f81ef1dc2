use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::subscriptionmodels::SubscriptionStatus,
};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Package {0} not found")]
    PackageNotFound(Uuid),

    #[error("Package {0} is not open for purchase")]
    PackageInactive(Uuid),

    #[error("Subscription {0} not found")]
    SubscriptionNotFound(Uuid),

    #[error("Subscription {0} is in status {1:?}")]
    InvalidSubscriptionStatus(Uuid, SubscriptionStatus),

    #[error("Subscription {0} has already been processed or expired")]
    SubscriptionAlreadyProcessed(Uuid),

    #[error("Subscription {0} has reached its end date")]
    SubscriptionEnded(Uuid),

    #[error("Daily yield for subscription {0} has already been claimed today")]
    AlreadyClaimedToday(Uuid),

    #[error("User {0} is not authorized to act on subscription {1}")]
    UnauthorizedAccess(Uuid, Uuid),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Wallet not found for user {0}")]
    WalletNotFound(Uuid),

    #[error("Request {0} not found")]
    RequestNotFound(Uuid),

    #[error("Request {0} has already been processed")]
    RequestAlreadyProcessed(Uuid),

    #[error("Only one withdrawal request per day is allowed")]
    DuplicateDailyRequest,

    #[error("Withdrawals can only be requested Monday to Friday, {0}:00 to {1}:00")]
    WithdrawalWindowClosed(u32, u32),

    #[error("Withdrawal PIN has not been set")]
    PinNotSet,

    #[error("Withdrawal PIN is incorrect")]
    InvalidPin,

    #[error("Gift code is invalid, expired or already redeemed")]
    GiftCodeUnavailable,

    #[error("Could not generate a unique gift code")]
    GiftCodePoolExhausted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::PackageNotFound(_)
            | ServiceError::SubscriptionNotFound(_)
            | ServiceError::RequestNotFound(_)
            | ServiceError::WalletNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::PackageInactive(_)
            | ServiceError::InvalidSubscriptionStatus(_, _)
            | ServiceError::SubscriptionEnded(_)
            | ServiceError::WithdrawalWindowClosed(_, _)
            | ServiceError::PinNotSet
            | ServiceError::InvalidPin
            | ServiceError::GiftCodeUnavailable
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::SubscriptionAlreadyProcessed(_)
            | ServiceError::AlreadyClaimedToday(_)
            | ServiceError::RequestAlreadyProcessed(_)
            | ServiceError::DuplicateDailyRequest => HttpError::conflict(error.to_string()),

            ServiceError::UnauthorizedAccess(_, _) => HttpError::unauthorized(error.to_string()),

            ServiceError::InsufficientFunds { .. } => {
                HttpError::payment_required(error.to_string())
            }

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::PackageNotFound(_)
            | ServiceError::SubscriptionNotFound(_)
            | ServiceError::RequestNotFound(_)
            | ServiceError::WalletNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::PackageInactive(_)
            | ServiceError::InvalidSubscriptionStatus(_, _)
            | ServiceError::SubscriptionEnded(_)
            | ServiceError::WithdrawalWindowClosed(_, _)
            | ServiceError::PinNotSet
            | ServiceError::InvalidPin
            | ServiceError::GiftCodeUnavailable
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::SubscriptionAlreadyProcessed(_)
            | ServiceError::AlreadyClaimedToday(_)
            | ServiceError::RequestAlreadyProcessed(_)
            | ServiceError::DuplicateDailyRequest => StatusCode::CONFLICT,

            ServiceError::UnauthorizedAccess(_, _) => StatusCode::UNAUTHORIZED,

            ServiceError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,

            ServiceError::Database(_)
            | ServiceError::Notification(_)
            | ServiceError::GiftCodePoolExhausted
            | ServiceError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the insert bounced off a unique index (duplicate request,
    /// code collision).
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23505")
            .unwrap_or(false)
    }
}
