// dtos/walletdtos.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::walletdb::WalletOverview;
use crate::dtos::userdtos::validate_phone_number;
use crate::models::requestmodels::*;
use crate::models::walletmodels::*;
use crate::utils::currency::cents_to_kes;

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponseDto {
    pub id: Uuid,
    pub balance: f64, // In KES
    pub available_balance: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl From<Wallet> for WalletResponseDto {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            balance: wallet.balance_in_kes(),
            available_balance: wallet.available_balance_in_kes(),
            total_invested: wallet.total_invested_in_kes(),
            total_returns: wallet.total_returns_in_kes(),
            created_at: wallet.created_at.unwrap_or_else(Utc::now),
            last_activity_at: wallet.last_activity_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletOverviewDto {
    pub balance: f64,
    pub available_balance: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
    pub referral_earnings: f64,
}

impl From<WalletOverview> for WalletOverviewDto {
    fn from(overview: WalletOverview) -> Self {
        Self {
            balance: cents_to_kes(overview.balance),
            available_balance: cents_to_kes(overview.available_balance),
            total_invested: cents_to_kes(overview.total_invested),
            total_returns: cents_to_kes(overview.total_returns),
            total_deposited: cents_to_kes(overview.total_deposited),
            total_withdrawn: cents_to_kes(overview.total_withdrawn),
            referral_earnings: cents_to_kes(overview.referral_earnings),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponseDto {
    pub id: Uuid,
    pub entry_type: EntryType,
    pub amount: f64,
    pub balance_before: f64,
    pub balance_after: f64,
    pub status: EntryStatus,
    pub reference: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<WalletEntry> for EntryResponseDto {
    fn from(entry: WalletEntry) -> Self {
        Self {
            id: entry.id,
            entry_type: entry.entry_type,
            amount: entry.amount_in_kes(),
            balance_before: cents_to_kes(entry.balance_before),
            balance_after: cents_to_kes(entry.balance_after),
            status: entry.status,
            reference: entry.reference,
            description: entry.description,
            created_at: entry.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct EntryHistoryQueryDto {
    pub entry_type: Option<EntryType>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "Offset must be non-negative"))]
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DepositRequestDto {
    #[validate(range(min = 1.0, message = "Amount must be positive"))]
    pub amount: f64,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,

    #[validate(length(min = 10, message = "Paste the full M-Pesa confirmation message"))]
    pub mpesa_message: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct WithdrawalRequestDto {
    #[validate(range(min = 1.0, message = "Amount must be positive"))]
    pub amount: f64,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,

    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawalRequestResponseDto {
    pub id: Uuid,
    pub amount: f64,
    pub phone_number: String,
    pub status: RequestStatus,
    pub requested_on: NaiveDate,
    pub admin_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<WithdrawalRequest> for WithdrawalRequestResponseDto {
    fn from(request: WithdrawalRequest) -> Self {
        Self {
            id: request.id,
            amount: cents_to_kes(request.amount),
            phone_number: request.phone_number,
            status: request.status,
            requested_on: request.requested_on,
            admin_note: request.admin_note,
            created_at: request.created_at,
            processed_at: request.processed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequestResponseDto {
    pub id: Uuid,
    pub amount: f64,
    pub phone_number: String,
    pub status: RequestStatus,
    pub admin_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<DepositRequest> for DepositRequestResponseDto {
    fn from(request: DepositRequest) -> Self {
        Self {
            id: request.id,
            amount: cents_to_kes(request.amount),
            phone_number: request.phone_number,
            status: request.status,
            admin_note: request.admin_note,
            created_at: request.created_at,
            processed_at: request.processed_at,
        }
    }
}
