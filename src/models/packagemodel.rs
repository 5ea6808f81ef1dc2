use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "package_status", rename_all = "snake_case")]
pub enum PackageStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub price: i64, // in cents
    pub duration_days: i32,
    pub roi_percent: i32, // percent of price returned over the full duration
    pub status: PackageStatus,
    pub subscribers: i32,
    pub total_revenue: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
