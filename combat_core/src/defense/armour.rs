//! Armor - Physical damage divided by the combined armor multiplier

use tracing::warn;

/// Calculate physical damage after armor
///
/// The armor multiplier is a divisor: 2.0 halves incoming damage, 1.0 is
/// neutral. A non-positive multiplier is treated as neutral.
pub fn apply_armor(amount: f64, multiplier: f64) -> f64 {
    if multiplier <= 0.0 || !multiplier.is_finite() {
        warn!(multiplier, "ignoring non-positive armor multiplier");
        return amount;
    }
    amount / multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_armor() {
        assert!((apply_armor(40.0, 1.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defending_halves_damage() {
        assert!((apply_armor(40.0, 2.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_multiplier_is_neutral() {
        assert!((apply_armor(40.0, 0.0) - 40.0).abs() < f64::EPSILON);
    }
}
