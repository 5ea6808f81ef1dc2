use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GiftCode {
    pub id: Uuid,
    pub code: String,
    pub amount: i64,
    pub is_active: bool,
    pub is_redeemed: bool,
    pub redeemed_by: Option<Uuid>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl GiftCode {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && !self.is_redeemed
            && self.expires_at.map_or(true, |expires| expires > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expires_at: Option<DateTime<Utc>>) -> GiftCode {
        GiftCode {
            id: Uuid::new_v4(),
            code: "PSV-1234".to_string(),
            amount: 50000,
            is_active: true,
            is_redeemed: false,
            redeemed_by: None,
            redeemed_at: None,
            created_by: Uuid::new_v4(),
            expires_at,
            created_at: None,
        }
    }

    #[test]
    fn test_redeemable() {
        let now = Utc::now();
        assert!(sample(None).is_redeemable(now));
        assert!(sample(Some(now + Duration::hours(1))).is_redeemable(now));
    }

    #[test]
    fn test_expired_not_redeemable() {
        let now = Utc::now();
        assert!(!sample(Some(now - Duration::hours(1))).is_redeemable(now));
    }

    #[test]
    fn test_redeemed_or_inactive_not_redeemable() {
        let now = Utc::now();
        let mut redeemed = sample(None);
        redeemed.is_redeemed = true;
        assert!(!redeemed.is_redeemable(now));

        let mut inactive = sample(None);
        inactive.is_active = false;
        assert!(!inactive.is_redeemable(now));
    }
}
