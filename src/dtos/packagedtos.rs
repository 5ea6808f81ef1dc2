// dtos/packagedtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::packagemodel::{Package, PackageStatus};
use crate::utils::currency::cents_to_kes;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePackageDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(range(min = 1.0, message = "Price must be positive"))]
    pub price: f64,

    #[validate(range(min = 1, max = 3650, message = "Duration must be between 1 and 3650 days"))]
    pub duration_days: i32,

    #[validate(range(min = 1, max = 1000, message = "ROI must be between 1 and 1000 percent"))]
    pub roi_percent: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePackageDto {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(range(min = 1.0, message = "Price must be positive"))]
    pub price: Option<f64>,

    #[validate(range(min = 1, max = 3650, message = "Duration must be between 1 and 3650 days"))]
    pub duration_days: Option<i32>,

    #[validate(range(min = 1, max = 1000, message = "ROI must be between 1 and 1000 percent"))]
    pub roi_percent: Option<i32>,

    pub status: Option<PackageStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PackageResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64, // In KES
    pub duration_days: i32,
    pub roi_percent: i32,
    pub daily_yield: f64,
    pub status: PackageStatus,
    pub subscribers: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Package> for PackageResponseDto {
    fn from(package: Package) -> Self {
        let daily_yield = crate::service::commission::daily_yield_cents(
            package.price,
            package.roi_percent,
            package.duration_days,
        );
        Self {
            id: package.id,
            name: package.name,
            price: cents_to_kes(package.price),
            duration_days: package.duration_days,
            roi_percent: package.roi_percent,
            daily_yield: cents_to_kes(daily_yield),
            status: package.status,
            subscribers: package.subscribers,
            created_at: package.created_at,
        }
    }
}

// Admin view keeps the revenue counter
#[derive(Debug, Serialize, Deserialize)]
pub struct PackageAdminResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_days: i32,
    pub roi_percent: i32,
    pub status: PackageStatus,
    pub subscribers: i32,
    pub total_revenue: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Package> for PackageAdminResponseDto {
    fn from(package: Package) -> Self {
        Self {
            id: package.id,
            name: package.name,
            price: cents_to_kes(package.price),
            duration_days: package.duration_days,
            roi_percent: package.roi_percent,
            status: package.status,
            subscribers: package.subscribers,
            total_revenue: cents_to_kes(package.total_revenue),
            created_at: package.created_at,
            updated_at: package.updated_at,
        }
    }
}
