// dtos/admindtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::giftcodemodel::GiftCode;
use crate::models::notificationmodel::{AdminNotification, UserNotification};
use crate::utils::currency::cents_to_kes;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewDto {
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AdminWalletAdjustDto {
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,

    #[validate(length(min = 1, max = 200, message = "Reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateGiftCodeDto {
    #[validate(range(min = 1.0, message = "Amount must be positive"))]
    pub amount: f64,

    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RedeemGiftCodeDto {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GiftCodeResponseDto {
    pub id: Uuid,
    pub code: String,
    pub amount: f64,
    pub is_active: bool,
    pub is_redeemed: bool,
    pub redeemed_by: Option<Uuid>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<GiftCode> for GiftCodeResponseDto {
    fn from(code: GiftCode) -> Self {
        Self {
            id: code.id,
            code: code.code,
            amount: cents_to_kes(code.amount),
            is_active: code.is_active,
            is_redeemed: code.is_redeemed,
            redeemed_by: code.redeemed_by,
            redeemed_at: code.redeemed_at,
            expires_at: code.expires_at,
            created_at: code.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserNotificationDto {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserNotification> for UserNotificationDto {
    fn from(notification: UserNotification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminNotificationDto {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<AdminNotification> for AdminNotificationDto {
    fn from(notification: AdminNotification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            metadata: notification.metadata,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}
