// models/subscriptionmodels.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Wallet,
    Mpesa,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
pub enum SubscriptionStatus {
    PendingPayment,
    PendingApproval,
    Active,
    Completed,
    Rejected,
}

impl SubscriptionStatus {
    pub fn to_str(&self) -> &str {
        match self {
            SubscriptionStatus::PendingPayment => "pending_payment",
            SubscriptionStatus::PendingApproval => "pending_approval",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Completed => "completed",
            SubscriptionStatus::Rejected => "rejected",
        }
    }

    /// The single source of truth for legal lifecycle transitions.
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, next),
            (PendingPayment, PendingApproval)
                | (PendingPayment, Rejected)
                | (PendingApproval, Active)
                | (PendingApproval, Rejected)
                | (Active, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Completed | SubscriptionStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PackageSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    // Snapshot of the package at purchase time; later catalog edits do not
    // change the terms of an existing subscription.
    pub package_name: String,
    pub package_price: i64,
    pub duration_days: i32,
    pub roi_percent: i32,
    pub payment_method: PaymentMethod,
    pub status: SubscriptionStatus,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub total_earnings: i64,
    pub last_claim_date: Option<NaiveDate>,
    pub expires_at: Option<DateTime<Utc>>,
    pub mpesa_message: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub review_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyClaim {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub claim_date: NaiveDate,
    pub amount: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::SubscriptionStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert!(PendingPayment.can_transition_to(PendingApproval));
        assert!(PendingPayment.can_transition_to(Rejected));
        assert!(PendingApproval.can_transition_to(Active));
        assert!(PendingApproval.can_transition_to(Rejected));
        assert!(Active.can_transition_to(Completed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!PendingPayment.can_transition_to(Active));
        assert!(!Active.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Active.can_transition_to(PendingApproval));
    }

    #[test]
    fn test_terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Active.is_terminal());
        assert!(!PendingPayment.is_terminal());
    }
}
