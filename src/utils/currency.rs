/// Currency utility functions for handling Kenyan Shilling conversions
///
/// All monetary values in the database are stored in cents (1 KES = 100 cents)
/// to avoid floating-point precision issues.

/// Convert Shillings to cents (multiply by 100)
pub fn kes_to_cents(kes: f64) -> i64 {
    (kes * 100.0).round() as i64
}

/// Convert cents to Shillings (divide by 100)
pub fn cents_to_kes(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format cents as a Shilling string with 2 decimal places
pub fn format_cents_as_kes(cents: i64) -> String {
    format!("KSh {:.2}", cents_to_kes(cents))
}

/// Validate and parse amount string to cents
pub fn parse_amount_to_cents(amount_str: &str) -> Result<i64, String> {
    amount_str
        .parse::<f64>()
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if amount < 0.0 {
                Err("Amount cannot be negative".to_string())
            } else {
                Ok(kes_to_cents(amount))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kes_to_cents() {
        assert_eq!(kes_to_cents(100.0), 10000);
        assert_eq!(kes_to_cents(0.50), 50);
        assert_eq!(kes_to_cents(123.45), 12345);
    }

    #[test]
    fn test_cents_to_kes() {
        assert_eq!(cents_to_kes(10000), 100.0);
        assert_eq!(cents_to_kes(50), 0.50);
        assert_eq!(cents_to_kes(12345), 123.45);
    }

    #[test]
    fn test_format_cents_as_kes() {
        assert_eq!(format_cents_as_kes(10000), "KSh 100.00");
        assert_eq!(format_cents_as_kes(50), "KSh 0.50");
        assert_eq!(format_cents_as_kes(12345), "KSh 123.45");
    }

    #[test]
    fn test_parse_amount_to_cents() {
        assert_eq!(parse_amount_to_cents("100.00"), Ok(10000));
        assert_eq!(parse_amount_to_cents("0.50"), Ok(50));
        assert_eq!(
            parse_amount_to_cents("-100"),
            Err("Amount cannot be negative".to_string())
        );
        assert_eq!(
            parse_amount_to_cents("abc"),
            Err("Invalid amount format".to_string())
        );
    }
}
