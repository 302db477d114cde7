//! Display rounding shared by the aggregators.
//!
//! Halves round toward positive infinity (`-0.125` becomes `-0.12`), so the
//! numbers match what the journal has always shown.

/// Rounds to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Rounds to the nearest integer.
pub fn round_whole(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents() {
        assert_eq!(round_cents(198.0), 198.0);
        assert_eq!(round_cents(1.005 * 1000.0), 1005.0);
        assert_eq!(round_cents(2.344), 2.34);
        assert_eq!(round_cents(2.346), 2.35);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_whole(2.5), 3.0);
        assert_eq!(round_whole(-2.5), -2.0);
        assert_eq!(round_cents(-0.125), -0.12);
    }

    #[test]
    fn nan_propagates() {
        assert!(round_cents(f64::NAN).is_nan());
        assert!(round_whole(f64::NAN).is_nan());
    }
}
