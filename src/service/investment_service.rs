// service/investment_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        db::DBClient,
        packagedb::{self, PackageExt},
        subscriptiondb::{self, SubscriptionExt},
        userdb::UserExt,
        walletdb::{self, WalletExt},
    },
    models::{
        packagemodel::{Package, PackageStatus},
        subscriptionmodels::{DailyClaim, PackageSubscription, PaymentMethod, SubscriptionStatus},
        usermodel::User,
        walletmodels::{generate_entry_reference, EntryType},
    },
    service::{commission, error::ServiceError, notification_service::NotificationService},
};

#[derive(Debug, Clone)]
pub struct InvestmentService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    env: Config,
}

impl InvestmentService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        env: Config,
    ) -> Self {
        Self {
            db_client,
            notification_service,
            env,
        }
    }

    async fn load_active_package(&self, package_id: Uuid) -> Result<Package, ServiceError> {
        let package = self
            .db_client
            .get_package(package_id)
            .await?
            .ok_or(ServiceError::PackageNotFound(package_id))?;

        if package.status != PackageStatus::Active {
            return Err(ServiceError::PackageInactive(package_id));
        }

        Ok(package)
    }

    /// Wallet-paid purchase. Debit, subscription, package counters, the
    /// purchase-day claim placeholder and the first-purchase referral bonus
    /// all commit or roll back together.
    pub async fn purchase_with_wallet(
        &self,
        user: &User,
        package_id: Uuid,
    ) -> Result<PackageSubscription, ServiceError> {
        let package = self.load_active_package(package_id).await?;

        let wallet = self
            .db_client
            .get_wallet(user.id)
            .await?
            .ok_or(ServiceError::WalletNotFound(user.id))?;

        if wallet.available_balance < package.price {
            return Err(ServiceError::InsufficientFunds {
                required: package.price,
                available: wallet.available_balance,
            });
        }

        let mut tx = self.db_client.pool.begin().await?;

        let first_purchase =
            !subscriptiondb::has_funded_subscription_in_tx(&mut tx, user.id, None).await?;

        let subscription =
            subscriptiondb::insert_active_subscription_in_tx(&mut tx, user.id, &package).await?;

        let debit = walletdb::debit_wallet_in_tx(
            &mut tx,
            user.id,
            package.price,
            EntryType::Investment,
            format!("Investment in {} package", package.name),
            generate_entry_reference(),
            Some(subscription.id),
        )
        .await?;

        if debit.is_none() {
            // Balance moved between the pre-check and the lock.
            tx.rollback().await?;
            return Err(ServiceError::InsufficientFunds {
                required: package.price,
                available: wallet.available_balance,
            });
        }

        packagedb::increment_package_counters_in_tx(&mut tx, package.id, package.price).await?;

        // Purchase day is marked claimed at zero; yield starts tomorrow.
        subscriptiondb::record_daily_claim_in_tx(
            &mut tx,
            subscription.id,
            user.id,
            Utc::now().date_naive(),
            0,
        )
        .await?;

        let referral_bonus = if first_purchase {
            self.credit_first_purchase_bonus_in_tx(&mut tx, user, &subscription)
                .await?
        } else {
            None
        };

        tx.commit().await?;

        if let Some((referrer_id, bonus)) = referral_bonus {
            let _ = self
                .notification_service
                .notify_referral_bonus(referrer_id, bonus, &subscription)
                .await;
        }
        let _ = self
            .notification_service
            .notify_subscription_activated(&subscription)
            .await;

        Ok(subscription)
    }

    /// M-Pesa purchase: park the subscription until the confirmation message
    /// arrives. Nothing is debited here.
    pub async fn begin_mpesa_purchase(
        &self,
        user: &User,
        package_id: Uuid,
    ) -> Result<PackageSubscription, ServiceError> {
        let package = self.load_active_package(package_id).await?;

        let expires_at = Utc::now() + Duration::minutes(self.env.pending_payment_ttl_minutes);
        let subscription = self
            .db_client
            .create_pending_subscription(user.id, &package, expires_at)
            .await?;

        let _ = self
            .notification_service
            .notify_admins_pending_review(
                "subscription_pending_payment",
                "New M-Pesa package purchase".to_string(),
                format!(
                    "{} started an M-Pesa purchase of the {} package",
                    user.username, package.name
                ),
                subscription.id,
            )
            .await;

        Ok(subscription)
    }

    pub async fn submit_payment_message(
        &self,
        user: &User,
        subscription_id: Uuid,
        message: String,
    ) -> Result<PackageSubscription, ServiceError> {
        let subscription = self
            .db_client
            .submit_payment_message(subscription_id, user.id, message)
            .await?
            .ok_or(ServiceError::SubscriptionAlreadyProcessed(subscription_id))?;

        let _ = self
            .notification_service
            .notify_admins_pending_review(
                "subscription_pending_approval",
                "M-Pesa payment awaiting verification".to_string(),
                format!(
                    "{} submitted an M-Pesa confirmation for the {} package",
                    user.username, subscription.package_name
                ),
                subscription.id,
            )
            .await;

        Ok(subscription)
    }

    /// Admin approval of a pending subscription. Wallet-paid requests are
    /// debited here; M-Pesa requests were paid off-platform.
    pub async fn approve_subscription(
        &self,
        admin_id: Uuid,
        subscription_id: Uuid,
        note: Option<String>,
    ) -> Result<PackageSubscription, ServiceError> {
        let subscription = self
            .db_client
            .get_subscription(subscription_id)
            .await?
            .ok_or(ServiceError::SubscriptionNotFound(subscription_id))?;

        if !subscription
            .status
            .can_transition_to(SubscriptionStatus::Active)
        {
            return Err(ServiceError::InvalidSubscriptionStatus(
                subscription_id,
                subscription.status,
            ));
        }

        let owner = self
            .db_client
            .get_user(Some(subscription.user_id), None, None)
            .await?
            .ok_or_else(|| ServiceError::Other("Subscription owner no longer exists".to_string()))?;

        let mut tx = self.db_client.pool.begin().await?;

        let approved = subscriptiondb::transition_status_in_tx(
            &mut tx,
            subscription_id,
            SubscriptionStatus::PendingApproval,
            SubscriptionStatus::Active,
            Some(admin_id),
            note,
        )
        .await?
        .ok_or(ServiceError::SubscriptionAlreadyProcessed(subscription_id))?;

        let first_purchase =
            !subscriptiondb::has_funded_subscription_in_tx(&mut tx, owner.id, Some(subscription_id))
                .await?;

        if approved.payment_method == PaymentMethod::Wallet {
            let debit = walletdb::debit_wallet_in_tx(
                &mut tx,
                owner.id,
                approved.package_price,
                EntryType::Investment,
                format!("Investment in {} package", approved.package_name),
                generate_entry_reference(),
                Some(approved.id),
            )
            .await?;

            if debit.is_none() {
                tx.rollback().await?;
                let wallet = self.db_client.get_wallet(owner.id).await?;
                return Err(ServiceError::InsufficientFunds {
                    required: approved.package_price,
                    available: wallet.map(|w| w.available_balance).unwrap_or(0),
                });
            }
        }

        packagedb::increment_package_counters_in_tx(
            &mut tx,
            approved.package_id,
            approved.package_price,
        )
        .await?;

        subscriptiondb::record_daily_claim_in_tx(
            &mut tx,
            approved.id,
            owner.id,
            Utc::now().date_naive(),
            0,
        )
        .await?;

        let referral_bonus = if first_purchase {
            self.credit_first_purchase_bonus_in_tx(&mut tx, &owner, &approved)
                .await?
        } else {
            None
        };

        tx.commit().await?;

        if let Some((referrer_id, bonus)) = referral_bonus {
            let _ = self
                .notification_service
                .notify_referral_bonus(referrer_id, bonus, &approved)
                .await;
        }
        let _ = self
            .notification_service
            .notify_subscription_activated(&approved)
            .await;

        Ok(approved)
    }

    /// Admin rejection. Refunds only when the price was actually debited
    /// from the wallet (the M-Pesa path never held anything).
    pub async fn reject_subscription(
        &self,
        admin_id: Uuid,
        subscription_id: Uuid,
        note: Option<String>,
    ) -> Result<PackageSubscription, ServiceError> {
        let subscription = self
            .db_client
            .get_subscription(subscription_id)
            .await?
            .ok_or(ServiceError::SubscriptionNotFound(subscription_id))?;

        if !subscription
            .status
            .can_transition_to(SubscriptionStatus::Rejected)
        {
            return Err(ServiceError::InvalidSubscriptionStatus(
                subscription_id,
                subscription.status,
            ));
        }

        let already_debited = self
            .db_client
            .get_entry_for_related(subscription_id, EntryType::Investment)
            .await?;
        let already_refunded = self
            .db_client
            .get_entry_for_related(subscription_id, EntryType::Refund)
            .await?;

        let mut tx = self.db_client.pool.begin().await?;

        let rejected = subscriptiondb::transition_status_in_tx(
            &mut tx,
            subscription_id,
            subscription.status,
            SubscriptionStatus::Rejected,
            Some(admin_id),
            note.clone(),
        )
        .await?
        .ok_or(ServiceError::SubscriptionAlreadyProcessed(subscription_id))?;

        if rejected.payment_method == PaymentMethod::Wallet {
            if let (Some(debit), None) = (already_debited, already_refunded) {
                walletdb::credit_wallet_in_tx(
                    &mut tx,
                    rejected.user_id,
                    debit.amount,
                    EntryType::Refund,
                    format!("Refund for rejected {} investment", rejected.package_name),
                    generate_entry_reference(),
                    Some(rejected.id),
                )
                .await?;
            }
        }

        tx.commit().await?;

        let _ = self
            .notification_service
            .notify_subscription_rejected(&rejected, note.as_deref())
            .await;

        Ok(rejected)
    }

    /// Daily yield claim. The unique (subscription, day) index makes the
    /// claim itself race-free; the payout and the referral cut ride the same
    /// transaction.
    pub async fn claim_daily_yield(
        &self,
        user: &User,
        subscription_id: Uuid,
    ) -> Result<(DailyClaim, i64), ServiceError> {
        let subscription = self
            .db_client
            .get_subscription(subscription_id)
            .await?
            .ok_or(ServiceError::SubscriptionNotFound(subscription_id))?;

        if subscription.user_id != user.id {
            return Err(ServiceError::UnauthorizedAccess(user.id, subscription_id));
        }

        if subscription.status != SubscriptionStatus::Active {
            return Err(ServiceError::InvalidSubscriptionStatus(
                subscription_id,
                subscription.status,
            ));
        }

        let now = Utc::now();
        if let Some(ends_at) = subscription.ends_at {
            if now > ends_at {
                let mut tx = self.db_client.pool.begin().await?;
                subscriptiondb::transition_status_in_tx(
                    &mut tx,
                    subscription_id,
                    SubscriptionStatus::Active,
                    SubscriptionStatus::Completed,
                    None,
                    None,
                )
                .await?;
                tx.commit().await?;
                return Err(ServiceError::SubscriptionEnded(subscription_id));
            }
        }

        // Yield is computed from the terms snapshotted at purchase; later
        // catalog edits do not touch running subscriptions.
        let daily_amount = commission::daily_yield_cents(
            subscription.package_price,
            subscription.roi_percent,
            subscription.duration_days,
        );

        let today = now.date_naive();
        let mut tx = self.db_client.pool.begin().await?;

        let claim = subscriptiondb::record_daily_claim_in_tx(
            &mut tx,
            subscription_id,
            user.id,
            today,
            daily_amount,
        )
        .await?;

        let claim = match claim {
            Some(claim) => claim,
            None => {
                tx.rollback().await?;
                return Err(ServiceError::AlreadyClaimedToday(subscription_id));
            }
        };

        walletdb::credit_wallet_in_tx(
            &mut tx,
            user.id,
            daily_amount,
            EntryType::DailyYield,
            format!("Daily yield from {} package", subscription.package_name),
            generate_entry_reference(),
            Some(subscription_id),
        )
        .await?;

        subscriptiondb::add_earnings_in_tx(&mut tx, subscription_id, daily_amount, today).await?;

        let mut subordinate_income = None;
        if let Some(referrer_id) = user.referred_by {
            let cut = commission::commission_cents(daily_amount, self.env.referral_yield_bps);
            if cut > 0 {
                walletdb::credit_wallet_in_tx(
                    &mut tx,
                    referrer_id,
                    cut,
                    EntryType::SubordinateIncome,
                    format!("Team earnings from {}'s daily yield", user.username),
                    generate_entry_reference(),
                    Some(subscription_id),
                )
                .await?;
                subordinate_income = Some((referrer_id, cut));
            }
        }

        tx.commit().await?;

        if let Some((referrer_id, cut)) = subordinate_income {
            let _ = self
                .notification_service
                .notify_subordinate_income(referrer_id, cut, &subscription)
                .await;
        }

        Ok((claim, daily_amount))
    }

    /// First-purchase referral bonus, posted inside the caller's
    /// transaction. Returns the credited (referrer, amount) pair.
    async fn credit_first_purchase_bonus_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner: &User,
        subscription: &PackageSubscription,
    ) -> Result<Option<(Uuid, i64)>, ServiceError> {
        let Some(referrer_id) = owner.referred_by else {
            return Ok(None);
        };

        let bonus = commission::commission_cents(
            subscription.package_price,
            self.env.referral_purchase_bps,
        );
        if bonus == 0 {
            return Ok(None);
        }

        walletdb::credit_wallet_in_tx(
            tx,
            referrer_id,
            bonus,
            EntryType::ReferralBonus,
            format!(
                "Referral bonus for {}'s first investment",
                owner.username
            ),
            generate_entry_reference(),
            Some(subscription.id),
        )
        .await?;

        Ok(Some((referrer_id, bonus)))
    }
}
