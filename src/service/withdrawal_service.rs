// service/withdrawal_service.rs
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        db::DBClient,
        requestdb::{self, RequestExt},
        userdb::UserExt,
        walletdb::{self, WalletExt},
    },
    models::{
        requestmodels::{RequestStatus, WithdrawalRequest},
        usermodel::User,
        walletmodels::{generate_entry_reference, EntryType},
    },
    service::{error::ServiceError, notification_service::NotificationService},
    utils::{currency::format_cents_as_kes, password},
};

#[derive(Debug, Clone)]
pub struct WithdrawalService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    env: Config,
}

/// Mon-Fri, [open_hour, close_hour) in platform-local time. The platform
/// runs on East Africa Time, expressed as a fixed offset from UTC.
pub fn submission_window_open(
    now: DateTime<Utc>,
    utc_offset_hours: i32,
    open_hour: u32,
    close_hour: u32,
) -> bool {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    let local = now.with_timezone(&offset);

    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    local.hour() >= open_hour && local.hour() < close_hour
}

impl WithdrawalService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        env: Config,
    ) -> Self {
        Self {
            db_client,
            notification_service,
            env,
        }
    }

    /// Create a withdrawal request. Funds are not held here; the approval
    /// step re-checks and debits atomically.
    pub async fn request_withdrawal(
        &self,
        user: &User,
        amount: i64,
        phone_number: String,
        pin: &str,
    ) -> Result<WithdrawalRequest, ServiceError> {
        if amount < self.env.min_withdrawal_cents {
            return Err(ServiceError::Validation(format!(
                "Minimum withdrawal is {}",
                format_cents_as_kes(self.env.min_withdrawal_cents)
            )));
        }
        if amount > self.env.max_withdrawal_cents {
            return Err(ServiceError::Validation(format!(
                "Maximum withdrawal is {}",
                format_cents_as_kes(self.env.max_withdrawal_cents)
            )));
        }

        if !submission_window_open(
            Utc::now(),
            self.env.local_utc_offset_hours,
            self.env.withdrawal_open_hour,
            self.env.withdrawal_close_hour,
        ) {
            return Err(ServiceError::WithdrawalWindowClosed(
                self.env.withdrawal_open_hour,
                self.env.withdrawal_close_hour,
            ));
        }

        // PIN is set on first withdrawal and verified ever after.
        match &user.withdrawal_pin_hash {
            Some(hash) => {
                let matched =
                    password::compare(pin, hash).map_err(|e| ServiceError::Other(e.to_string()))?;
                if !matched {
                    return Err(ServiceError::InvalidPin);
                }
            }
            None => {
                let hash =
                    password::hash(pin).map_err(|e| ServiceError::Validation(e.to_string()))?;
                self.db_client
                    .set_withdrawal_pin_hash(user.id, &hash)
                    .await?;
            }
        }

        let wallet = self
            .db_client
            .get_wallet(user.id)
            .await?
            .ok_or(ServiceError::WalletNotFound(user.id))?;

        if wallet.available_balance < amount {
            return Err(ServiceError::InsufficientFunds {
                required: amount,
                available: wallet.available_balance,
            });
        }

        let request = self
            .db_client
            .create_withdrawal_request(user.id, amount, phone_number)
            .await
            .map_err(|e| {
                if ServiceError::is_unique_violation(&e) {
                    ServiceError::DuplicateDailyRequest
                } else {
                    ServiceError::Database(e)
                }
            })?;

        let _ = self
            .notification_service
            .notify_admins_pending_review(
                "withdrawal_pending",
                "New withdrawal request".to_string(),
                format!(
                    "{} requested a withdrawal of {}",
                    user.username,
                    format_cents_as_kes(amount)
                ),
                request.id,
            )
            .await;

        Ok(request)
    }

    /// Approve and pay out. The debit and the status flip share one
    /// transaction, so a stale balance or a concurrent second approval
    /// cannot double-spend.
    pub async fn approve_withdrawal(
        &self,
        admin_id: Uuid,
        request_id: Uuid,
        note: Option<String>,
    ) -> Result<WithdrawalRequest, ServiceError> {
        let request = self
            .db_client
            .get_withdrawal_request(request_id)
            .await?
            .ok_or(ServiceError::RequestNotFound(request_id))?;

        if request.status != RequestStatus::Pending {
            return Err(ServiceError::RequestAlreadyProcessed(request_id));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let approved = requestdb::settle_withdrawal_in_tx(
            &mut tx,
            request_id,
            RequestStatus::Approved,
            admin_id,
            note,
        )
        .await?
        .ok_or(ServiceError::RequestAlreadyProcessed(request_id))?;

        let debit = walletdb::debit_wallet_in_tx(
            &mut tx,
            approved.user_id,
            approved.amount,
            EntryType::Withdrawal,
            format!("Withdrawal to {}", approved.phone_number),
            generate_entry_reference(),
            Some(approved.id),
        )
        .await?;

        if debit.is_none() {
            tx.rollback().await?;
            let wallet = self.db_client.get_wallet(approved.user_id).await?;
            return Err(ServiceError::InsufficientFunds {
                required: approved.amount,
                available: wallet.map(|w| w.available_balance).unwrap_or(0),
            });
        }

        tx.commit().await?;

        let _ = self
            .notification_service
            .notify_withdrawal_processed(&approved, true)
            .await;

        Ok(approved)
    }

    /// Reject. Nothing was held at request time, so there is no wallet
    /// action to compensate.
    pub async fn reject_withdrawal(
        &self,
        admin_id: Uuid,
        request_id: Uuid,
        note: Option<String>,
    ) -> Result<WithdrawalRequest, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let rejected = requestdb::settle_withdrawal_in_tx(
            &mut tx,
            request_id,
            RequestStatus::Rejected,
            admin_id,
            note,
        )
        .await?
        .ok_or(ServiceError::RequestAlreadyProcessed(request_id))?;

        tx.commit().await?;

        let _ = self
            .notification_service
            .notify_withdrawal_processed(&rejected, false)
            .await;

        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 2026-08-05 is a Wednesday.
    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_open_weekday_midmorning() {
        // 10:00 EAT == 07:00 UTC
        assert!(submission_window_open(utc(2026, 8, 5, 7, 0), 3, 9, 16));
    }

    #[test]
    fn test_closed_before_opening() {
        // 08:59 EAT == 05:59 UTC
        assert!(!submission_window_open(utc(2026, 8, 5, 5, 59), 3, 9, 16));
    }

    #[test]
    fn test_closed_at_closing_hour() {
        // 16:00 EAT == 13:00 UTC; the window is half-open
        assert!(!submission_window_open(utc(2026, 8, 5, 13, 0), 3, 9, 16));
        // 15:59 EAT is still open
        assert!(submission_window_open(utc(2026, 8, 5, 12, 59), 3, 9, 16));
    }

    #[test]
    fn test_closed_on_weekend() {
        // 2026-08-08 is a Saturday, 10:00 EAT
        assert!(!submission_window_open(utc(2026, 8, 8, 7, 0), 3, 9, 16));
        // Sunday
        assert!(!submission_window_open(utc(2026, 8, 9, 7, 0), 3, 9, 16));
    }

    #[test]
    fn test_offset_crosses_day_boundary() {
        // 22:00 UTC Friday is 01:00 Saturday at UTC+3 -> closed
        assert!(!submission_window_open(utc(2026, 8, 7, 22, 0), 3, 9, 16));
    }
}
