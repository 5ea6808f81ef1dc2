// db/packagedb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::packagemodel::{Package, PackageStatus};

const PACKAGE_COLUMNS: &str = r#"
    id,
    name,
    price,
    duration_days,
    roi_percent,
    status,
    subscribers,
    total_revenue,
    created_at,
    updated_at
"#;

#[async_trait]
pub trait PackageExt {
    async fn create_package(
        &self,
        name: String,
        price: i64,
        duration_days: i32,
        roi_percent: i32,
    ) -> Result<Package, Error>;

    async fn get_package(&self, package_id: Uuid) -> Result<Option<Package>, Error>;

    async fn get_packages(&self, include_inactive: bool) -> Result<Vec<Package>, Error>;

    async fn update_package(
        &self,
        package_id: Uuid,
        name: Option<String>,
        price: Option<i64>,
        duration_days: Option<i32>,
        roi_percent: Option<i32>,
        status: Option<PackageStatus>,
    ) -> Result<Package, Error>;

    async fn deactivate_package(&self, package_id: Uuid) -> Result<Package, Error>;
}

/// Bump subscriber and revenue counters inside the purchase/approval
/// transaction so they cannot drift from the subscriptions that fund them.
pub async fn increment_package_counters_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    package_id: Uuid,
    revenue: i64,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE packages
        SET subscribers = subscribers + 1,
            total_revenue = total_revenue + $2,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(package_id)
    .bind(revenue)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl PackageExt for DBClient {
    async fn create_package(
        &self,
        name: String,
        price: i64,
        duration_days: i32,
        roi_percent: i32,
    ) -> Result<Package, Error> {
        sqlx::query_as::<_, Package>(&format!(
            r#"
            INSERT INTO packages (name, price, duration_days, roi_percent)
            VALUES ($1, $2, $3, $4)
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(price)
        .bind(duration_days)
        .bind(roi_percent)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_package(&self, package_id: Uuid) -> Result<Option<Package>, Error> {
        sqlx::query_as::<_, Package>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_packages(&self, include_inactive: bool) -> Result<Vec<Package>, Error> {
        if include_inactive {
            sqlx::query_as::<_, Package>(&format!(
                "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY price ASC"
            ))
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Package>(&format!(
                r#"
                SELECT {PACKAGE_COLUMNS}
                FROM packages
                WHERE status = 'active'
                ORDER BY price ASC
                "#
            ))
            .fetch_all(&self.pool)
            .await
        }
    }

    async fn update_package(
        &self,
        package_id: Uuid,
        name: Option<String>,
        price: Option<i64>,
        duration_days: Option<i32>,
        roi_percent: Option<i32>,
        status: Option<PackageStatus>,
    ) -> Result<Package, Error> {
        sqlx::query_as::<_, Package>(&format!(
            r#"
            UPDATE packages
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                duration_days = COALESCE($4, duration_days),
                roi_percent = COALESCE($5, roi_percent),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(package_id)
        .bind(name)
        .bind(price)
        .bind(duration_days)
        .bind(roi_percent)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn deactivate_package(&self, package_id: Uuid) -> Result<Package, Error> {
        sqlx::query_as::<_, Package>(&format!(
            r#"
            UPDATE packages
            SET status = 'inactive', updated_at = NOW()
            WHERE id = $1
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(package_id)
        .fetch_one(&self.pool)
        .await
    }
}
