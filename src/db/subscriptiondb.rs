// db/subscriptiondb.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::packagemodel::Package;
use crate::models::subscriptionmodels::*;

const SUBSCRIPTION_COLUMNS: &str = r#"
    id,
    user_id,
    package_id,
    package_name,
    package_price,
    duration_days,
    roi_percent,
    payment_method,
    status,
    starts_at,
    ends_at,
    total_earnings,
    last_claim_date,
    expires_at,
    mpesa_message,
    reviewed_by,
    review_note,
    created_at,
    updated_at
"#;

#[async_trait]
pub trait SubscriptionExt {
    /// M-Pesa path: the subscription waits for a confirmation message.
    async fn create_pending_subscription(
        &self,
        user_id: Uuid,
        package: &Package,
        expires_at: DateTime<Utc>,
    ) -> Result<PackageSubscription, Error>;

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<PackageSubscription>, Error>;

    async fn get_user_subscriptions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PackageSubscription>, Error>;

    async fn get_subscriptions_by_status(
        &self,
        status: SubscriptionStatus,
    ) -> Result<Vec<PackageSubscription>, Error>;

    /// Attach the M-Pesa confirmation message and move the subscription to
    /// pending_approval. Guarded by the expected current status and the
    /// payment TTL; returns None when the request was already handled or
    /// has expired.
    async fn submit_payment_message(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
        message: String,
    ) -> Result<Option<PackageSubscription>, Error>;

    async fn has_funded_subscription(
        &self,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, Error>;

    async fn reject_expired_pending(&self) -> Result<u64, Error>;

    async fn complete_matured(&self) -> Result<u64, Error>;
}

/// Wallet path: the subscription is active from the moment of purchase.
pub async fn insert_active_subscription_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    package: &Package,
) -> Result<PackageSubscription, Error> {
    sqlx::query_as::<_, PackageSubscription>(&format!(
        r#"
        INSERT INTO package_subscriptions
        (user_id, package_id, package_name, package_price, duration_days, roi_percent,
         payment_method, status, starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'wallet'::payment_method, 'active'::subscription_status,
                NOW(), NOW() + make_interval(days => $5))
        RETURNING {SUBSCRIPTION_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(package.id)
    .bind(&package.name)
    .bind(package.price)
    .bind(package.duration_days)
    .bind(package.roi_percent)
    .fetch_one(&mut **tx)
    .await
}

/// Guarded status transition: the WHERE clause pins the expected current
/// status, so concurrent reviews cannot both win. Returns None when the row
/// was not in the expected state.
pub async fn transition_status_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    subscription_id: Uuid,
    from: SubscriptionStatus,
    to: SubscriptionStatus,
    reviewed_by: Option<Uuid>,
    review_note: Option<String>,
) -> Result<Option<PackageSubscription>, Error> {
    sqlx::query_as::<_, PackageSubscription>(&format!(
        r#"
        UPDATE package_subscriptions
        SET status = $3,
            reviewed_by = COALESCE($4, reviewed_by),
            review_note = COALESCE($5, review_note),
            starts_at = CASE WHEN $3 = 'active'::subscription_status THEN NOW() ELSE starts_at END,
            ends_at = CASE WHEN $3 = 'active'::subscription_status
                           THEN NOW() + make_interval(days => duration_days)
                           ELSE ends_at END,
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {SUBSCRIPTION_COLUMNS}
        "#
    ))
    .bind(subscription_id)
    .bind(from)
    .bind(to)
    .bind(reviewed_by)
    .bind(review_note)
    .fetch_optional(&mut **tx)
    .await
}

/// Record a claim for the day. The unique index on
/// (subscription_id, claim_date) makes this race-free: a concurrent
/// duplicate lands on ON CONFLICT DO NOTHING and comes back as None.
pub async fn record_daily_claim_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    subscription_id: Uuid,
    user_id: Uuid,
    claim_date: NaiveDate,
    amount: i64,
) -> Result<Option<DailyClaim>, Error> {
    sqlx::query_as::<_, DailyClaim>(
        r#"
        INSERT INTO daily_claims (subscription_id, user_id, claim_date, amount)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (subscription_id, claim_date) DO NOTHING
        RETURNING id, subscription_id, user_id, claim_date, amount, created_at
        "#,
    )
    .bind(subscription_id)
    .bind(user_id)
    .bind(claim_date)
    .bind(amount)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn add_earnings_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    subscription_id: Uuid,
    amount: i64,
    claim_date: NaiveDate,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE package_subscriptions
        SET total_earnings = total_earnings + $2,
            last_claim_date = $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(subscription_id)
    .bind(amount)
    .bind(claim_date)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn has_funded_subscription_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    exclude_id: Option<Uuid>,
) -> Result<bool, Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM package_subscriptions
            WHERE user_id = $1
              AND status IN ('active', 'completed')
              AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(user_id)
    .bind(exclude_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(exists)
}

#[async_trait]
impl SubscriptionExt for DBClient {
    async fn create_pending_subscription(
        &self,
        user_id: Uuid,
        package: &Package,
        expires_at: DateTime<Utc>,
    ) -> Result<PackageSubscription, Error> {
        sqlx::query_as::<_, PackageSubscription>(&format!(
            r#"
            INSERT INTO package_subscriptions
            (user_id, package_id, package_name, package_price, duration_days, roi_percent,
             payment_method, status, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'mpesa'::payment_method,
                    'pending_payment'::subscription_status, $7)
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(package.id)
        .bind(&package.name)
        .bind(package.price)
        .bind(package.duration_days)
        .bind(package.roi_percent)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<PackageSubscription>, Error> {
        sqlx::query_as::<_, PackageSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM package_subscriptions WHERE id = $1"
        ))
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_subscriptions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PackageSubscription>, Error> {
        sqlx::query_as::<_, PackageSubscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM package_subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_subscriptions_by_status(
        &self,
        status: SubscriptionStatus,
    ) -> Result<Vec<PackageSubscription>, Error> {
        sqlx::query_as::<_, PackageSubscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM package_subscriptions
            WHERE status = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn submit_payment_message(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
        message: String,
    ) -> Result<Option<PackageSubscription>, Error> {
        sqlx::query_as::<_, PackageSubscription>(&format!(
            r#"
            UPDATE package_subscriptions
            SET status = 'pending_approval'::subscription_status,
                mpesa_message = $3,
                updated_at = NOW()
            WHERE id = $1
              AND user_id = $2
              AND status = 'pending_payment'
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(subscription_id)
        .bind(user_id)
        .bind(message)
        .fetch_optional(&self.pool)
        .await
    }

    async fn has_funded_subscription(
        &self,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, Error> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM package_subscriptions
                WHERE user_id = $1
                  AND status IN ('active', 'completed')
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(user_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn reject_expired_pending(&self) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE package_subscriptions
            SET status = 'rejected'::subscription_status,
                review_note = 'Payment window expired',
                updated_at = NOW()
            WHERE status = 'pending_payment'
              AND expires_at IS NOT NULL
              AND expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn complete_matured(&self) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE package_subscriptions
            SET status = 'completed'::subscription_status,
                updated_at = NOW()
            WHERE status = 'active'
              AND ends_at IS NOT NULL
              AND ends_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
