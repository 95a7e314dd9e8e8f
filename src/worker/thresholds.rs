//! Threshold policy for premium per-coin alerts.
//!
//! The magnitude comes from [`crate::config::WorkerConfig`]; these predicates
//! only apply it symmetrically.

use rust_decimal::Decimal;

/// The 1-day change crossed the threshold upward.
pub fn crossed_up(change: Decimal, magnitude: Decimal) -> bool {
    change >= magnitude
}

/// The 1-day change crossed the threshold downward.
pub fn crossed_down(change: Decimal, magnitude: Decimal) -> bool {
    change <= -magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(crossed_up(dec!(5), dec!(5)));
        assert!(crossed_down(dec!(-5), dec!(5)));
    }

    #[test]
    fn test_inside_the_band_emits_nothing() {
        assert!(!crossed_up(dec!(4.99), dec!(5)));
        assert!(!crossed_down(dec!(-4.99), dec!(5)));
        assert!(!crossed_up(dec!(0), dec!(5)));
        assert!(!crossed_down(dec!(0), dec!(5)));
    }

    #[test]
    fn test_magnitude_is_configurable() {
        assert!(crossed_up(dec!(2.5), dec!(2)));
        assert!(!crossed_up(dec!(2.5), dec!(3)));
    }
}
