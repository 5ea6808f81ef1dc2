// service/commission.rs
//
// All commission arithmetic is integer maths over cents. Rates are carried
// in basis points (1 bps = 1/100th of a percent) and every division floors,
// so the platform never pays out more than the configured rate.

/// Daily yield of a subscription, from its snapshot terms.
///
/// The package ROI is a percentage of the price returned over the full
/// duration, so one day's share is price * roi / 100 / duration_days.
pub fn daily_yield_cents(price_cents: i64, roi_percent: i32, duration_days: i32) -> i64 {
    if duration_days <= 0 {
        return 0;
    }
    (price_cents * roi_percent as i64 / 100) / duration_days as i64
}

/// Commission on an amount at a basis-point rate.
pub fn commission_cents(amount_cents: i64, rate_bps: i64) -> i64 {
    amount_cents * rate_bps / 10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_yield() {
        // KES 1000 package, 10% over 30 days -> KES 3.33 per day
        assert_eq!(daily_yield_cents(100_000, 10, 30), 333);
        // KES 500 package, 20% over 10 days -> KES 10.00 per day
        assert_eq!(daily_yield_cents(50_000, 20, 10), 1_000);
    }

    #[test]
    fn test_daily_yield_degenerate_duration() {
        assert_eq!(daily_yield_cents(100_000, 10, 0), 0);
        assert_eq!(daily_yield_cents(100_000, 10, -5), 0);
    }

    #[test]
    fn test_purchase_commission() {
        // 15% of KES 1000
        assert_eq!(commission_cents(100_000, 1_500), 15_000);
    }

    #[test]
    fn test_yield_commission() {
        // 5% of the KES 3.33 daily yield floors to 16 cents
        assert_eq!(commission_cents(333, 500), 16);
    }

    #[test]
    fn test_commission_floors() {
        assert_eq!(commission_cents(1, 1_500), 0);
        assert_eq!(commission_cents(99, 500), 4);
    }
}
