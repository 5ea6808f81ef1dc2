// models/walletmodels.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "entry_type", rename_all = "snake_case")]
pub enum EntryType {
    Deposit,
    Withdrawal,
    Investment,
    DailyYield,
    ReferralBonus,
    SubordinateIncome,
    GiftCode,
    Refund,
    AdminCredit,
    AdminDebit,
}

impl EntryType {
    /// Entry types that count towards the wallet's total_returns accumulator.
    pub fn is_return(&self) -> bool {
        matches!(
            self,
            EntryType::DailyYield | EntryType::ReferralBonus | EntryType::SubordinateIncome
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "entry_status", rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Completed,
    Reversed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: i64,
    pub available_balance: i64,
    pub total_invested: i64,
    pub total_returns: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletEntry {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub entry_type: EntryType,
    pub amount: i64, // in cents, always positive; direction comes from entry_type
    pub balance_before: i64,
    pub balance_after: i64,
    pub status: EntryStatus,
    pub reference: String,
    pub description: String,
    pub related_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn balance_in_kes(&self) -> f64 {
        self.balance as f64 / 100.0
    }

    pub fn available_balance_in_kes(&self) -> f64 {
        self.available_balance as f64 / 100.0
    }

    pub fn total_invested_in_kes(&self) -> f64 {
        self.total_invested as f64 / 100.0
    }

    pub fn total_returns_in_kes(&self) -> f64 {
        self.total_returns as f64 / 100.0
    }
}

impl WalletEntry {
    pub fn amount_in_kes(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

pub fn generate_entry_reference() -> String {
    format!(
        "PSV_{}",
        uuid::Uuid::new_v4()
            .to_string()
            .replace("-", "")
            .to_uppercase()[..16]
            .to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_reference_format() {
        let reference = generate_entry_reference();
        assert!(reference.starts_with("PSV_"));
        assert_eq!(reference.len(), 20);
    }

    #[test]
    fn test_return_entry_types() {
        assert!(EntryType::DailyYield.is_return());
        assert!(EntryType::ReferralBonus.is_return());
        assert!(EntryType::SubordinateIncome.is_return());
        assert!(!EntryType::Deposit.is_return());
        assert!(!EntryType::Investment.is_return());
    }
}
