//! Commission split between platform and provider

use serde::Serialize;

/// Round a monetary amount to 2 decimal places
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Round a rating average to 1 decimal place
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The platform/provider split of a client price
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct FeeSplit {
    pub platform_fee: f64,
    pub provider_earning: f64,
}

impl FeeSplit {
    /// Split a gross client price by the configured commission percentage.
    ///
    /// The provider earning is the rounded remainder, so
    /// `platform_fee + provider_earning == client_price` holds exactly.
    pub fn calculate(client_price: f64, commission_percent: f64) -> Self {
        let platform_fee = round_money(client_price * commission_percent / 100.0);
        let provider_earning = round_money(client_price - platform_fee);

        Self {
            platform_fee,
            provider_earning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commission_split() {
        let split = FeeSplit::calculate(50.0, 15.0);
        assert_eq!(split.platform_fee, 7.5);
        assert_eq!(split.provider_earning, 42.5);
    }

    #[test]
    fn test_split_sums_to_price() {
        for price in [1.0, 9.99, 25.5, 50.0, 123.45, 1000.0] {
            let split = FeeSplit::calculate(price, 15.0);
            assert_eq!(
                round_money(split.platform_fee + split.provider_earning),
                price
            );
        }
    }

    #[test]
    fn test_split_with_awkward_percentage() {
        // 12.3% of 9.99 is 1.22877 -> fee rounds to 1.23
        let split = FeeSplit::calculate(9.99, 12.3);
        assert_eq!(split.platform_fee, 1.23);
        assert_eq!(split.provider_earning, 8.76);
    }

    #[test]
    fn test_zero_commission() {
        let split = FeeSplit::calculate(42.0, 0.0);
        assert_eq!(split.platform_fee, 0.0);
        assert_eq!(split.provider_earning, 42.0);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(7.499999999), 7.5);
        assert_eq!(round_money(7.504), 7.5);
        assert_eq!(round_money(7.506), 7.51);
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.333333), 4.3);
        assert_eq!(round_rating(4.25), 4.3);
        assert_eq!(round_rating(5.0), 5.0);
    }
}
