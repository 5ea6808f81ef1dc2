// service/notification_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{
        requestmodels::{DepositRequest, WithdrawalRequest},
        subscriptionmodels::PackageSubscription,
    },
    service::error::ServiceError,
    utils::currency::format_cents_as_kes,
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    async fn store_user_notification(
        &self,
        user_id: Uuid,
        kind: &str,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_user_notification(user_id, kind.to_string(), title, body, metadata)
            .await
            .map_err(|e| ServiceError::Notification(e.to_string()))?;

        Ok(())
    }

    async fn store_admin_notification(
        &self,
        kind: &str,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_admin_notification(kind.to_string(), title, body, metadata)
            .await
            .map_err(|e| ServiceError::Notification(e.to_string()))?;

        Ok(())
    }

    pub async fn notify_subscription_activated(
        &self,
        subscription: &PackageSubscription,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Subscription {} activated for user {}",
            subscription.id,
            subscription.user_id
        );

        self.store_user_notification(
            subscription.user_id,
            "subscription_activated",
            format!("{} investment is active", subscription.package_name),
            format!(
                "Your {} investment of {} is now active. Daily earnings start tomorrow.",
                subscription.package_name,
                format_cents_as_kes(subscription.package_price)
            ),
            Some(serde_json::json!({
                "subscription_id": subscription.id,
                "package_name": subscription.package_name,
                "amount": subscription.package_price,
            })),
        )
        .await
    }

    pub async fn notify_subscription_rejected(
        &self,
        subscription: &PackageSubscription,
        note: Option<&str>,
    ) -> Result<(), ServiceError> {
        self.store_user_notification(
            subscription.user_id,
            "subscription_rejected",
            format!("{} investment was rejected", subscription.package_name),
            note.map(|n| n.to_string()).unwrap_or_else(|| {
                "Your payment could not be verified. Contact support if you believe this is an error."
                    .to_string()
            }),
            Some(serde_json::json!({
                "subscription_id": subscription.id,
                "package_name": subscription.package_name,
            })),
        )
        .await
    }

    pub async fn notify_referral_bonus(
        &self,
        referrer_id: Uuid,
        amount: i64,
        source_subscription: &PackageSubscription,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Referral bonus of {} credited to {}",
            amount,
            referrer_id
        );

        self.store_user_notification(
            referrer_id,
            "referral_bonus",
            "Referral bonus earned".to_string(),
            format!(
                "You earned {} because someone you referred activated the {} package.",
                format_cents_as_kes(amount),
                source_subscription.package_name
            ),
            Some(serde_json::json!({
                "amount": amount,
                "subscription_id": source_subscription.id,
            })),
        )
        .await
    }

    pub async fn notify_subordinate_income(
        &self,
        referrer_id: Uuid,
        amount: i64,
        source_subscription: &PackageSubscription,
    ) -> Result<(), ServiceError> {
        self.store_user_notification(
            referrer_id,
            "subordinate_income",
            "Team earnings received".to_string(),
            format!(
                "You earned {} from your referral's daily {} yield.",
                format_cents_as_kes(amount),
                source_subscription.package_name
            ),
            Some(serde_json::json!({
                "amount": amount,
                "subscription_id": source_subscription.id,
            })),
        )
        .await
    }

    pub async fn notify_withdrawal_processed(
        &self,
        request: &WithdrawalRequest,
        approved: bool,
    ) -> Result<(), ServiceError> {
        let (title, body) = if approved {
            (
                "Withdrawal approved".to_string(),
                format!(
                    "Your withdrawal of {} has been approved and will be sent to {}.",
                    format_cents_as_kes(request.amount),
                    request.phone_number
                ),
            )
        } else {
            (
                "Withdrawal rejected".to_string(),
                request
                    .admin_note
                    .clone()
                    .unwrap_or_else(|| "Your withdrawal request was rejected.".to_string()),
            )
        };

        self.store_user_notification(
            request.user_id,
            if approved { "withdrawal_approved" } else { "withdrawal_rejected" },
            title,
            body,
            Some(serde_json::json!({
                "request_id": request.id,
                "amount": request.amount,
            })),
        )
        .await
    }

    pub async fn notify_deposit_processed(
        &self,
        request: &DepositRequest,
        approved: bool,
    ) -> Result<(), ServiceError> {
        let (title, body) = if approved {
            (
                "Deposit approved".to_string(),
                format!(
                    "Your deposit of {} has been credited to your wallet.",
                    format_cents_as_kes(request.amount)
                ),
            )
        } else {
            (
                "Deposit rejected".to_string(),
                request
                    .admin_note
                    .clone()
                    .unwrap_or_else(|| "Your deposit could not be verified.".to_string()),
            )
        };

        self.store_user_notification(
            request.user_id,
            if approved { "deposit_approved" } else { "deposit_rejected" },
            title,
            body,
            Some(serde_json::json!({
                "request_id": request.id,
                "amount": request.amount,
            })),
        )
        .await
    }

    pub async fn notify_gift_code_redeemed(
        &self,
        user_id: Uuid,
        code: &str,
        amount: i64,
    ) -> Result<(), ServiceError> {
        self.store_user_notification(
            user_id,
            "gift_code_redeemed",
            "Gift code redeemed".to_string(),
            format!(
                "Gift code {} added {} to your wallet.",
                code,
                format_cents_as_kes(amount)
            ),
            Some(serde_json::json!({ "code": code, "amount": amount })),
        )
        .await
    }

    /// Flag new pending work for the back office.
    pub async fn notify_admins_pending_review(
        &self,
        kind: &str,
        title: String,
        body: String,
        related_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.store_admin_notification(
            kind,
            title,
            body,
            Some(serde_json::json!({ "related_id": related_id })),
        )
        .await
    }
}
