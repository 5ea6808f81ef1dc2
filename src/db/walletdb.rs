// db/walletdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Row, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::*;
use crate::utils::decimal::BigDecimalHelpers;
use bigdecimal::BigDecimal;

const ENTRY_COLUMNS: &str = r#"
    id,
    wallet_id,
    user_id,
    entry_type,
    amount,
    balance_before,
    balance_after,
    status,
    reference,
    description,
    related_id,
    created_at
"#;

#[async_trait]
pub trait WalletExt {
    async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, Error>;
    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, Error>;

    /// Post a credit to the wallet. The single authoritative posting
    /// operation: balance and available_balance always move together, and
    /// every call leaves a wallet_entries row behind.
    async fn credit_wallet(
        &self,
        user_id: Uuid,
        amount: i64,
        entry_type: EntryType,
        description: String,
        reference: String,
        related_id: Option<Uuid>,
    ) -> Result<WalletEntry, Error>;

    /// Post a debit. Returns `Ok(None)` when the available balance does not
    /// cover the amount; nothing is written in that case.
    async fn debit_wallet(
        &self,
        user_id: Uuid,
        amount: i64,
        entry_type: EntryType,
        description: String,
        reference: String,
        related_id: Option<Uuid>,
    ) -> Result<Option<WalletEntry>, Error>;

    async fn get_wallet_entries(
        &self,
        user_id: Uuid,
        entry_type: Option<EntryType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletEntry>, Error>;

    async fn get_entry_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<WalletEntry>, Error>;

    /// Most recent completed entry of a given type tied to a related record
    /// (subscription, request or gift code).
    async fn get_entry_for_related(
        &self,
        related_id: Uuid,
        entry_type: EntryType,
    ) -> Result<Option<WalletEntry>, Error>;

    async fn get_wallet_overview(&self, user_id: Uuid) -> Result<WalletOverview, Error>;
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WalletOverview {
    pub balance: i64,
    pub available_balance: i64,
    pub total_invested: i64,
    pub total_returns: i64,
    pub total_deposited: i64,
    pub total_withdrawn: i64,
    pub referral_earnings: i64,
}

/// Credit inside a caller-owned transaction. Locks the wallet row, moves
/// balance and available_balance together, bumps total_returns for yield
/// and commission entries, and records the ledger row.
pub async fn credit_wallet_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    amount: i64,
    entry_type: EntryType,
    description: String,
    reference: String,
    related_id: Option<Uuid>,
) -> Result<WalletEntry, Error> {
    let wallet = sqlx::query(
        "SELECT id, balance, available_balance FROM wallets WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    let balance_before = wallet.get::<i64, _>("balance");
    let balance_after = balance_before + amount;
    let available_after = wallet.get::<i64, _>("available_balance") + amount;

    sqlx::query(
        r#"
        UPDATE wallets
        SET balance = $2,
            available_balance = $3,
            total_returns = CASE WHEN $4 THEN total_returns + $5 ELSE total_returns END,
            updated_at = NOW(),
            last_activity_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(wallet.get::<Uuid, _>("id"))
    .bind(balance_after)
    .bind(available_after)
    .bind(entry_type.is_return())
    .bind(amount)
    .execute(&mut **tx)
    .await?;

    insert_entry(
        tx,
        wallet.get::<Uuid, _>("id"),
        user_id,
        entry_type,
        amount,
        balance_before,
        balance_after,
        reference,
        description,
        related_id,
    )
    .await
}

/// Debit inside a caller-owned transaction. Returns `Ok(None)` without
/// writing when available_balance < amount.
pub async fn debit_wallet_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    amount: i64,
    entry_type: EntryType,
    description: String,
    reference: String,
    related_id: Option<Uuid>,
) -> Result<Option<WalletEntry>, Error> {
    let wallet = sqlx::query(
        "SELECT id, balance, available_balance FROM wallets WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    if wallet.get::<i64, _>("available_balance") < amount {
        return Ok(None);
    }

    let balance_before = wallet.get::<i64, _>("balance");
    let balance_after = balance_before - amount;
    let available_after = wallet.get::<i64, _>("available_balance") - amount;

    sqlx::query(
        r#"
        UPDATE wallets
        SET balance = $2,
            available_balance = $3,
            total_invested = CASE WHEN $4 THEN total_invested + $5 ELSE total_invested END,
            updated_at = NOW(),
            last_activity_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(wallet.get::<Uuid, _>("id"))
    .bind(balance_after)
    .bind(available_after)
    .bind(entry_type == EntryType::Investment)
    .bind(amount)
    .execute(&mut **tx)
    .await?;

    let entry = insert_entry(
        tx,
        wallet.get::<Uuid, _>("id"),
        user_id,
        entry_type,
        amount,
        balance_before,
        balance_after,
        reference,
        description,
        related_id,
    )
    .await?;

    Ok(Some(entry))
}

async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    wallet_id: Uuid,
    user_id: Uuid,
    entry_type: EntryType,
    amount: i64,
    balance_before: i64,
    balance_after: i64,
    reference: String,
    description: String,
    related_id: Option<Uuid>,
) -> Result<WalletEntry, Error> {
    sqlx::query_as::<_, WalletEntry>(&format!(
        r#"
        INSERT INTO wallet_entries
        (wallet_id, user_id, entry_type, amount, balance_before, balance_after,
         reference, description, related_id, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'completed'::entry_status)
        RETURNING {ENTRY_COLUMNS}
        "#
    ))
    .bind(wallet_id)
    .bind(user_id)
    .bind(entry_type)
    .bind(amount)
    .bind(balance_before)
    .bind(balance_after)
    .bind(reference)
    .bind(description)
    .bind(related_id)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl WalletExt for DBClient {
    async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, Error> {
        sqlx::query_as::<_, Wallet>(
            r#"
            INSERT INTO wallets (user_id)
            VALUES ($1)
            RETURNING
                id,
                user_id,
                balance,
                available_balance,
                total_invested,
                total_returns,
                created_at,
                updated_at,
                last_activity_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, Error> {
        sqlx::query_as::<_, Wallet>(
            r#"
            SELECT
                id,
                user_id,
                balance,
                available_balance,
                total_invested,
                total_returns,
                created_at,
                updated_at,
                last_activity_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn credit_wallet(
        &self,
        user_id: Uuid,
        amount: i64,
        entry_type: EntryType,
        description: String,
        reference: String,
        related_id: Option<Uuid>,
    ) -> Result<WalletEntry, Error> {
        let mut tx = self.pool.begin().await?;
        let entry = credit_wallet_in_tx(
            &mut tx,
            user_id,
            amount,
            entry_type,
            description,
            reference,
            related_id,
        )
        .await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn debit_wallet(
        &self,
        user_id: Uuid,
        amount: i64,
        entry_type: EntryType,
        description: String,
        reference: String,
        related_id: Option<Uuid>,
    ) -> Result<Option<WalletEntry>, Error> {
        let mut tx = self.pool.begin().await?;
        let entry = debit_wallet_in_tx(
            &mut tx,
            user_id,
            amount,
            entry_type,
            description,
            reference,
            related_id,
        )
        .await?;
        match entry {
            Some(entry) => {
                tx.commit().await?;
                Ok(Some(entry))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    async fn get_wallet_entries(
        &self,
        user_id: Uuid,
        entry_type: Option<EntryType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletEntry>, Error> {
        match entry_type {
            Some(entry_type) => {
                sqlx::query_as::<_, WalletEntry>(&format!(
                    r#"
                    SELECT {ENTRY_COLUMNS}
                    FROM wallet_entries
                    WHERE user_id = $1 AND entry_type = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#
                ))
                .bind(user_id)
                .bind(entry_type)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, WalletEntry>(&format!(
                    r#"
                    SELECT {ENTRY_COLUMNS}
                    FROM wallet_entries
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn get_entry_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<WalletEntry>, Error> {
        sqlx::query_as::<_, WalletEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM wallet_entries
            WHERE reference = $1
            "#
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_entry_for_related(
        &self,
        related_id: Uuid,
        entry_type: EntryType,
    ) -> Result<Option<WalletEntry>, Error> {
        sqlx::query_as::<_, WalletEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM wallet_entries
            WHERE related_id = $1 AND entry_type = $2 AND status = 'completed'
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(related_id)
        .bind(entry_type)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_wallet_overview(&self, user_id: Uuid) -> Result<WalletOverview, Error> {
        let wallet = sqlx::query(
            r#"
            SELECT balance, available_balance, total_invested, total_returns
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let totals = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE entry_type = 'deposit'), 0) AS deposited,
                COALESCE(SUM(amount) FILTER (WHERE entry_type = 'withdrawal'), 0) AS withdrawn,
                COALESCE(SUM(amount) FILTER (WHERE entry_type IN ('referral_bonus', 'subordinate_income')), 0) AS referral
            FROM wallet_entries
            WHERE user_id = $1 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(WalletOverview {
            balance: wallet.get::<i64, _>("balance"),
            available_balance: wallet.get::<i64, _>("available_balance"),
            total_invested: wallet.get::<i64, _>("total_invested"),
            total_returns: wallet.get::<i64, _>("total_returns"),
            total_deposited: totals.get::<Option<BigDecimal>, _>("deposited").to_i64_or_zero(),
            total_withdrawn: totals.get::<Option<BigDecimal>, _>("withdrawn").to_i64_or_zero(),
            referral_earnings: totals.get::<Option<BigDecimal>, _>("referral").to_i64_or_zero(),
        })
    }
}
