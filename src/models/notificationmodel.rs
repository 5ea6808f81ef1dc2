use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminNotification {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}
