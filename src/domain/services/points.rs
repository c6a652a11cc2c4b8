use chrono::{DateTime, Duration, Utc};
use crate::domain::models::loyalty::LoyaltyConfig;

/// Points earned for a completed appointment: the number of full currency
/// units in the snapshotted price, times the per-unit rate. The unit count is
/// floored before multiplying, so price 770 at 1 unit per 100 and 10 points
/// per unit earns 70, not 77.
pub fn points_earned(price: i64, config: &LoyaltyConfig) -> i64 {
    if config.currency_unit_amount <= 0 {
        return 0;
    }
    (price / config.currency_unit_amount) * config.points_per_unit
}

/// Earliest start time a prior completed appointment may have to qualify the
/// client for the rebooking bonus.
pub fn rebooking_cutoff(now: DateTime<Utc>, config: &LoyaltyConfig) -> DateTime<Utc> {
    now - Duration::days(config.rebooking_window_days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(points_per_unit: i64, currency_unit_amount: i64) -> LoyaltyConfig {
        LoyaltyConfig {
            points_per_unit,
            currency_unit_amount,
            ..LoyaltyConfig::defaults("salon".to_string())
        }
    }

    #[test]
    fn floors_unit_count_before_multiplying() {
        assert_eq!(points_earned(770, &config(10, 100)), 70);
        assert_eq!(points_earned(799, &config(10, 100)), 70);
        assert_eq!(points_earned(800, &config(10, 100)), 80);
    }

    #[test]
    fn exact_multiples() {
        assert_eq!(points_earned(750, &config(1, 10)), 75);
        assert_eq!(points_earned(0, &config(1, 10)), 0);
    }

    #[test]
    fn zero_unit_amount_earns_nothing() {
        assert_eq!(points_earned(500, &config(1, 0)), 0);
    }

    #[test]
    fn rebooking_window() {
        let now = Utc::now();
        let cfg = config(1, 10);
        assert_eq!(rebooking_cutoff(now, &cfg), now - Duration::days(56));
    }
}
