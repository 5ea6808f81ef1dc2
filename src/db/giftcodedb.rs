// db/giftcodedb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::giftcodemodel::GiftCode;

const GIFT_CODE_COLUMNS: &str = r#"
    id,
    code,
    amount,
    is_active,
    is_redeemed,
    redeemed_by,
    redeemed_at,
    created_by,
    expires_at,
    created_at
"#;

#[async_trait]
pub trait GiftCodeExt {
    async fn gift_code_exists(&self, code: &str) -> Result<bool, Error>;

    async fn create_gift_code(
        &self,
        code: String,
        amount: i64,
        created_by: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GiftCode, Error>;

    async fn get_gift_code(&self, code: &str) -> Result<Option<GiftCode>, Error>;

    async fn get_gift_codes(&self, limit: i64, offset: i64) -> Result<Vec<GiftCode>, Error>;

    async fn deactivate_gift_code(&self, gift_code_id: Uuid) -> Result<Option<GiftCode>, Error>;
}

/// Exactly-once claim: active, unredeemed and unexpired are all part of the
/// UPDATE filter, so of two concurrent redeemers only one gets the row back.
pub async fn claim_gift_code_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    user_id: Uuid,
) -> Result<Option<GiftCode>, Error> {
    sqlx::query_as::<_, GiftCode>(&format!(
        r#"
        UPDATE gift_codes
        SET is_redeemed = TRUE,
            redeemed_by = $2,
            redeemed_at = NOW()
        WHERE code = $1
          AND is_active = TRUE
          AND is_redeemed = FALSE
          AND (expires_at IS NULL OR expires_at > NOW())
        RETURNING {GIFT_CODE_COLUMNS}
        "#
    ))
    .bind(code)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

#[async_trait]
impl GiftCodeExt for DBClient {
    async fn gift_code_exists(&self, code: &str) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM gift_codes WHERE code = $1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await
    }

    async fn create_gift_code(
        &self,
        code: String,
        amount: i64,
        created_by: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GiftCode, Error> {
        sqlx::query_as::<_, GiftCode>(&format!(
            r#"
            INSERT INTO gift_codes (code, amount, created_by, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {GIFT_CODE_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(amount)
        .bind(created_by)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_gift_code(&self, code: &str) -> Result<Option<GiftCode>, Error> {
        sqlx::query_as::<_, GiftCode>(&format!(
            "SELECT {GIFT_CODE_COLUMNS} FROM gift_codes WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_gift_codes(&self, limit: i64, offset: i64) -> Result<Vec<GiftCode>, Error> {
        sqlx::query_as::<_, GiftCode>(&format!(
            r#"
            SELECT {GIFT_CODE_COLUMNS}
            FROM gift_codes
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn deactivate_gift_code(&self, gift_code_id: Uuid) -> Result<Option<GiftCode>, Error> {
        sqlx::query_as::<_, GiftCode>(&format!(
            r#"
            UPDATE gift_codes
            SET is_active = FALSE
            WHERE id = $1 AND is_redeemed = FALSE
            RETURNING {GIFT_CODE_COLUMNS}
            "#
        ))
        .bind(gift_code_id)
        .fetch_optional(&self.pool)
        .await
    }
}
