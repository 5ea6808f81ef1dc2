use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub phone_number: String,
    pub status: RequestStatus,
    pub requested_on: NaiveDate,
    pub processed_by: Option<Uuid>,
    pub admin_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepositRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub phone_number: String,
    pub mpesa_message: String,
    pub status: RequestStatus,
    pub processed_by: Option<Uuid>,
    pub admin_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}
