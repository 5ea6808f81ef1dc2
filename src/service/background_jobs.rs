// service/background_jobs.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{db::subscriptiondb::SubscriptionExt, AppState};

/// Reject pending M-Pesa purchases whose payment window has lapsed.
pub async fn start_pending_payment_expiry_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(600)); // Run every 10 minutes

    loop {
        interval.tick().await;

        match app_state.db_client.reject_expired_pending().await {
            Ok(0) => {}
            Ok(count) => tracing::info!(
                "Pending payment expiry job: {} purchases expired at {}",
                count,
                Utc::now()
            ),
            Err(e) => tracing::error!("Pending payment expiry job failed: {}", e),
        }
    }
}

/// Close out subscriptions that have run their full duration.
pub async fn start_subscription_maturity_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(3600)); // Run every hour

    loop {
        interval.tick().await;

        match app_state.db_client.complete_matured().await {
            Ok(0) => {}
            Ok(count) => tracing::info!(
                "Subscription maturity job: {} subscriptions completed at {}",
                count,
                Utc::now()
            ),
            Err(e) => tracing::error!("Subscription maturity job failed: {}", e),
        }
    }
}
