// service/gift_code_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        giftcodedb::{self, GiftCodeExt},
        walletdb,
    },
    models::{
        giftcodemodel::GiftCode,
        usermodel::User,
        walletmodels::{generate_entry_reference, EntryType},
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

const CODE_PREFIX: &str = "PSV";
const MAX_GENERATION_ATTEMPTS: usize = 20;

pub fn generate_gift_code() -> String {
    format!("{}-{:04}", CODE_PREFIX, rand::rng().random_range(0..10_000))
}

#[derive(Debug, Clone)]
pub struct GiftCodeService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl GiftCodeService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Mint a new code. The 4-digit space is small, so collisions are
    /// expected; retry until an unused code sticks.
    pub async fn create_gift_code(
        &self,
        admin_id: Uuid,
        amount: i64,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GiftCode, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::Validation(
                "Gift code amount must be positive".to_string(),
            ));
        }

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_gift_code();

            if self.db_client.gift_code_exists(&code).await? {
                continue;
            }

            match self
                .db_client
                .create_gift_code(code, amount, admin_id, expires_at)
                .await
            {
                Ok(gift_code) => return Ok(gift_code),
                // Lost the race on the unique index; pick another code.
                Err(e) if ServiceError::is_unique_violation(&e) => continue,
                Err(e) => return Err(ServiceError::Database(e)),
            }
        }

        Err(ServiceError::GiftCodePoolExhausted)
    }

    /// Exactly-once redemption: the guarded UPDATE claims the code and the
    /// wallet credit commits with it.
    pub async fn redeem(&self, user: &User, code: &str) -> Result<(GiftCode, i64), ServiceError> {
        let code = code.trim().to_uppercase();

        let mut tx = self.db_client.pool.begin().await?;

        let gift_code = giftcodedb::claim_gift_code_in_tx(&mut tx, &code, user.id)
            .await?
            .ok_or(ServiceError::GiftCodeUnavailable)?;

        walletdb::credit_wallet_in_tx(
            &mut tx,
            user.id,
            gift_code.amount,
            EntryType::GiftCode,
            format!("Gift code {} redeemed", gift_code.code),
            generate_entry_reference(),
            Some(gift_code.id),
        )
        .await?;

        tx.commit().await?;

        let _ = self
            .notification_service
            .notify_gift_code_redeemed(user.id, &gift_code.code, gift_code.amount)
            .await;

        let amount = gift_code.amount;
        Ok((gift_code, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gift_code_shape() {
        let code = generate_gift_code();
        assert!(code.starts_with("PSV-"));
        assert_eq!(code.len(), 8);
        assert!(code[4..].chars().all(|c| c.is_ascii_digit()));
    }
}
