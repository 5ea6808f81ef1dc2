// service/deposit_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        db::DBClient,
        requestdb::{self, RequestExt},
        walletdb,
    },
    models::{
        requestmodels::{DepositRequest, RequestStatus},
        usermodel::User,
        walletmodels::{generate_entry_reference, EntryType},
    },
    service::{error::ServiceError, notification_service::NotificationService},
    utils::currency::format_cents_as_kes,
};

#[derive(Debug, Clone)]
pub struct DepositService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    env: Config,
}

impl DepositService {
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

    /// User reports an M-Pesa payment; credited only after admin review.
    pub async fn request_deposit(
        &self,
        user: &User,
        amount: i64,
        phone_number: String,
        mpesa_message: String,
    ) -> Result<DepositRequest, ServiceError> {
        if amount < self.env.min_deposit_cents {
            return Err(ServiceError::Validation(format!(
                "Minimum deposit is {}",
                format_cents_as_kes(self.env.min_deposit_cents)
            )));
        }

        let request = self
            .db_client
            .create_deposit_request(user.id, amount, phone_number, mpesa_message)
            .await?;

        let _ = self
            .notification_service
            .notify_admins_pending_review(
                "deposit_pending",
                "New deposit awaiting verification".to_string(),
                format!(
                    "{} reported an M-Pesa deposit of {}",
                    user.username,
                    format_cents_as_kes(amount)
                ),
                request.id,
            )
            .await;

        Ok(request)
    }

    pub async fn approve_deposit(
        &self,
        admin_id: Uuid,
        request_id: Uuid,
        note: Option<String>,
    ) -> Result<DepositRequest, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let approved = requestdb::settle_deposit_in_tx(
            &mut tx,
            request_id,
            RequestStatus::Approved,
            admin_id,
            note,
        )
        .await?
        .ok_or(ServiceError::RequestAlreadyProcessed(request_id))?;

        walletdb::credit_wallet_in_tx(
            &mut tx,
            approved.user_id,
            approved.amount,
            EntryType::Deposit,
            "M-Pesa deposit".to_string(),
            generate_entry_reference(),
            Some(approved.id),
        )
        .await?;

        tx.commit().await?;

        let _ = self
            .notification_service
            .notify_deposit_processed(&approved, true)
            .await;

        Ok(approved)
    }

    pub async fn reject_deposit(
        &self,
        admin_id: Uuid,
        request_id: Uuid,
        note: Option<String>,
    ) -> Result<DepositRequest, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let rejected = requestdb::settle_deposit_in_tx(
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
            .notify_deposit_processed(&rejected, false)
            .await;

        Ok(rejected)
    }
}
