// db/requestdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::requestmodels::*;

const WITHDRAWAL_COLUMNS: &str = r#"
    id,
    user_id,
    amount,
    phone_number,
    status,
    requested_on,
    processed_by,
    admin_note,
    created_at,
    processed_at
"#;

const DEPOSIT_COLUMNS: &str = r#"
    id,
    user_id,
    amount,
    phone_number,
    mpesa_message,
    status,
    processed_by,
    admin_note,
    created_at,
    processed_at
"#;

#[async_trait]
pub trait RequestExt {
    /// One request per user per calendar day; the unique index on
    /// (user_id, requested_on) turns a duplicate into a constraint error.
    async fn create_withdrawal_request(
        &self,
        user_id: Uuid,
        amount: i64,
        phone_number: String,
    ) -> Result<WithdrawalRequest, Error>;

    async fn get_withdrawal_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<WithdrawalRequest>, Error>;

    async fn get_user_withdrawal_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawalRequest>, Error>;

    async fn get_withdrawal_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<WithdrawalRequest>, Error>;

    async fn create_deposit_request(
        &self,
        user_id: Uuid,
        amount: i64,
        phone_number: String,
        mpesa_message: String,
    ) -> Result<DepositRequest, Error>;

    async fn get_deposit_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<DepositRequest>, Error>;

    async fn get_user_deposit_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DepositRequest>, Error>;

    async fn get_deposit_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DepositRequest>, Error>;
}

/// Guarded pending -> approved/rejected move; None when another admin got
/// there first.
pub async fn settle_withdrawal_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
    to: RequestStatus,
    processed_by: Uuid,
    admin_note: Option<String>,
) -> Result<Option<WithdrawalRequest>, Error> {
    sqlx::query_as::<_, WithdrawalRequest>(&format!(
        r#"
        UPDATE withdrawal_requests
        SET status = $2,
            processed_by = $3,
            admin_note = $4,
            processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING {WITHDRAWAL_COLUMNS}
        "#
    ))
    .bind(request_id)
    .bind(to)
    .bind(processed_by)
    .bind(admin_note)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn settle_deposit_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
    to: RequestStatus,
    processed_by: Uuid,
    admin_note: Option<String>,
) -> Result<Option<DepositRequest>, Error> {
    sqlx::query_as::<_, DepositRequest>(&format!(
        r#"
        UPDATE deposit_requests
        SET status = $2,
            processed_by = $3,
            admin_note = $4,
            processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING {DEPOSIT_COLUMNS}
        "#
    ))
    .bind(request_id)
    .bind(to)
    .bind(processed_by)
    .bind(admin_note)
    .fetch_optional(&mut **tx)
    .await
}

#[async_trait]
impl RequestExt for DBClient {
    async fn create_withdrawal_request(
        &self,
        user_id: Uuid,
        amount: i64,
        phone_number: String,
    ) -> Result<WithdrawalRequest, Error> {
        sqlx::query_as::<_, WithdrawalRequest>(&format!(
            r#"
            INSERT INTO withdrawal_requests (user_id, amount, phone_number)
            VALUES ($1, $2, $3)
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_withdrawal_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<WithdrawalRequest>, Error> {
        sqlx::query_as::<_, WithdrawalRequest>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawal_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_withdrawal_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawalRequest>, Error> {
        sqlx::query_as::<_, WithdrawalRequest>(&format!(
            r#"
            SELECT {WITHDRAWAL_COLUMNS}
            FROM withdrawal_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_withdrawal_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<WithdrawalRequest>, Error> {
        sqlx::query_as::<_, WithdrawalRequest>(&format!(
            r#"
            SELECT {WITHDRAWAL_COLUMNS}
            FROM withdrawal_requests
            WHERE status = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_deposit_request(
        &self,
        user_id: Uuid,
        amount: i64,
        phone_number: String,
        mpesa_message: String,
    ) -> Result<DepositRequest, Error> {
        sqlx::query_as::<_, DepositRequest>(&format!(
            r#"
            INSERT INTO deposit_requests (user_id, amount, phone_number, mpesa_message)
            VALUES ($1, $2, $3, $4)
            RETURNING {DEPOSIT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount)
        .bind(phone_number)
        .bind(mpesa_message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_deposit_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<DepositRequest>, Error> {
        sqlx::query_as::<_, DepositRequest>(&format!(
            "SELECT {DEPOSIT_COLUMNS} FROM deposit_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_deposit_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DepositRequest>, Error> {
        sqlx::query_as::<_, DepositRequest>(&format!(
            r#"
            SELECT {DEPOSIT_COLUMNS}
            FROM deposit_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_deposit_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DepositRequest>, Error> {
        sqlx::query_as::<_, DepositRequest>(&format!(
            r#"
            SELECT {DEPOSIT_COLUMNS}
            FROM deposit_requests
            WHERE status = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }
}
