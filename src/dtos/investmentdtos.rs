// dtos/investmentdtos.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::subscriptionmodels::*;
use crate::utils::currency::cents_to_kes;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PurchasePackageDto {
    pub package_id: Uuid,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitPaymentDto {
    #[validate(length(min = 10, message = "Paste the full M-Pesa confirmation message"))]
    pub mpesa_message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponseDto {
    pub id: Uuid,
    pub package_id: Uuid,
    pub package_name: String,
    pub package_price: f64,
    pub duration_days: i32,
    pub roi_percent: i32,
    pub daily_yield: f64,
    pub payment_method: PaymentMethod,
    pub status: SubscriptionStatus,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub total_earnings: f64,
    pub last_claim_date: Option<NaiveDate>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PackageSubscription> for SubscriptionResponseDto {
    fn from(sub: PackageSubscription) -> Self {
        let daily_yield = crate::service::commission::daily_yield_cents(
            sub.package_price,
            sub.roi_percent,
            sub.duration_days,
        );
        Self {
            id: sub.id,
            package_id: sub.package_id,
            package_name: sub.package_name,
            package_price: cents_to_kes(sub.package_price),
            duration_days: sub.duration_days,
            roi_percent: sub.roi_percent,
            daily_yield: cents_to_kes(daily_yield),
            payment_method: sub.payment_method,
            status: sub.status,
            starts_at: sub.starts_at,
            ends_at: sub.ends_at,
            total_earnings: cents_to_kes(sub.total_earnings),
            last_claim_date: sub.last_claim_date,
            expires_at: sub.expires_at,
            created_at: sub.created_at,
        }
    }
}

/// Returned for M-Pesa purchases so the user knows where to send money.
#[derive(Debug, Serialize, Deserialize)]
pub struct MpesaInstructionsDto {
    pub subscription: SubscriptionResponseDto,
    pub till_number: String,
    pub amount: f64,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponseDto {
    pub subscription_id: Uuid,
    pub claim_date: NaiveDate,
    pub amount: f64,
}
