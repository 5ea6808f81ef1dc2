// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Commission rates in basis points (1/100th of a percent)
    pub referral_purchase_bps: i64,
    pub referral_yield_bps: i64,
    // Wallet limits, in cents
    pub min_withdrawal_cents: i64,
    pub max_withdrawal_cents: i64,
    pub min_deposit_cents: i64,
    // Withdrawal submission window, hours in platform-local time
    pub withdrawal_open_hour: u32,
    pub withdrawal_close_hour: u32,
    pub local_utc_offset_hours: i32,
    // M-Pesa purchase flow
    pub pending_payment_ttl_minutes: i64,
    pub mpesa_till_number: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let referral_purchase_bps = std::env::var("REFERRAL_PURCHASE_BPS")
            .unwrap_or_else(|_| "1500".to_string());
        let referral_yield_bps = std::env::var("REFERRAL_YIELD_BPS")
            .unwrap_or_else(|_| "500".to_string());

        // Defaults: KES 100 minimum withdrawal, KES 500,000 maximum, KES 50 minimum deposit
        let min_withdrawal_cents = std::env::var("MIN_WITHDRAWAL_CENTS")
            .unwrap_or_else(|_| "10000".to_string());
        let max_withdrawal_cents = std::env::var("MAX_WITHDRAWAL_CENTS")
            .unwrap_or_else(|_| "50000000".to_string());
        let min_deposit_cents = std::env::var("MIN_DEPOSIT_CENTS")
            .unwrap_or_else(|_| "5000".to_string());

        let withdrawal_open_hour = std::env::var("WITHDRAWAL_OPEN_HOUR")
            .unwrap_or_else(|_| "9".to_string());
        let withdrawal_close_hour = std::env::var("WITHDRAWAL_CLOSE_HOUR")
            .unwrap_or_else(|_| "16".to_string());
        let local_utc_offset_hours = std::env::var("LOCAL_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "3".to_string());

        let pending_payment_ttl_minutes = std::env::var("PENDING_PAYMENT_TTL_MINUTES")
            .unwrap_or_else(|_| "30".to_string());
        let mpesa_till_number = std::env::var("MPESA_TILL_NUMBER")
            .unwrap_or_else(|_| "000000".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            referral_purchase_bps: referral_purchase_bps.parse::<i64>().unwrap(),
            referral_yield_bps: referral_yield_bps.parse::<i64>().unwrap(),
            min_withdrawal_cents: min_withdrawal_cents.parse::<i64>().unwrap(),
            max_withdrawal_cents: max_withdrawal_cents.parse::<i64>().unwrap(),
            min_deposit_cents: min_deposit_cents.parse::<i64>().unwrap(),
            withdrawal_open_hour: withdrawal_open_hour.parse::<u32>().unwrap(),
            withdrawal_close_hour: withdrawal_close_hour.parse::<u32>().unwrap(),
            local_utc_offset_hours: local_utc_offset_hours.parse::<i32>().unwrap(),
            pending_payment_ttl_minutes: pending_payment_ttl_minutes.parse::<i64>().unwrap(),
            mpesa_till_number,
        }
    }
}
