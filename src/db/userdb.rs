// db/userdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::User;
use crate::utils::decimal::BigDecimalHelpers;
use bigdecimal::BigDecimal;

const USER_COLUMNS: &str = r#"
    id,
    name,
    username,
    email,
    password,
    phone_number,
    role,
    referral_code,
    referred_by,
    withdrawal_pin_hash,
    verified,
    created_at,
    updated_at
"#;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReferralStats {
    pub total_referrals: i64,
    pub total_commission: i64,
    pub referred_users: Vec<ReferredUser>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReferredUser {
    pub id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    /// Insert the user and their empty wallet in one transaction.
    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        password: T,
        phone_number: Option<String>,
        referral_code: String,
        referred_by: Option<Uuid>,
    ) -> Result<User, sqlx::Error>;

    async fn get_user_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn set_withdrawal_pin_hash(
        &self,
        user_id: Uuid,
        pin_hash: &str,
    ) -> Result<User, sqlx::Error>;

    async fn get_referral_stats(&self, user_id: Uuid) -> Result<ReferralStats, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
            ))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        password: T,
        phone_number: Option<String>,
        referral_code: String,
        referred_by: Option<Uuid>,
    ) -> Result<User, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, username, email, password, phone_number, referral_code, referred_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name.into())
        .bind(username.into())
        .bind(email.into())
        .bind(password.into())
        .bind(phone_number)
        .bind(referral_code)
        .bind(referred_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO wallets (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn get_user_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE referral_code = $1"
        ))
        .bind(referral_code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_withdrawal_pin_hash(
        &self,
        user_id: Uuid,
        pin_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET withdrawal_pin_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(pin_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_referral_stats(&self, user_id: Uuid) -> Result<ReferralStats, sqlx::Error> {
        let referred = sqlx::query(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE referred_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let commission = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total
            FROM wallet_entries
            WHERE user_id = $1
              AND entry_type IN ('referral_bonus', 'subordinate_income')
              AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let referred_users = referred
            .iter()
            .map(|row| ReferredUser {
                id: row.get("id"),
                username: row.get("username"),
                joined_at: row.get("created_at"),
            })
            .collect::<Vec<_>>();

        Ok(ReferralStats {
            total_referrals: referred_users.len() as i64,
            total_commission: commission
                .get::<Option<BigDecimal>, _>("total")
                .to_i64_or_zero(),
            referred_users,
        })
    }
}
