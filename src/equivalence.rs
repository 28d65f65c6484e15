//! Power-law race time equivalence
//!
//! `T2 = T1 × (D2 / D1)^1.06`. An approximation used only where the published
//! chart has no column for one of the distances involved.

use crate::models::CanonicalDistance;
use crate::time_codec::RaceTime;

/// Fatigue exponent of the power-law model
pub const EQUIVALENCE_EXPONENT: f64 = 1.06;

/// Converts race times between distances with the power-law model
pub struct EquivalenceConverter;

impl EquivalenceConverter {
    /// Equivalent time at `target` for a runner who ran `known_time` over `known`
    pub fn convert(
        known_time: RaceTime,
        known: CanonicalDistance,
        target: CanonicalDistance,
    ) -> RaceTime {
        if known == target {
            return known_time;
        }
        RaceTime::from_seconds_f64(Self::convert_seconds(
            known_time.as_f64(),
            known.meters(),
            target.meters(),
        ))
    }

    /// Unrounded conversion over raw meters
    pub fn convert_seconds(known_seconds: f64, known_meters: f64, target_meters: f64) -> f64 {
        if known_meters <= 0.0 || target_meters <= 0.0 {
            return known_seconds;
        }
        if known_meters == target_meters {
            return known_seconds;
        }
        known_seconds * (target_meters / known_meters).powf(EQUIVALENCE_EXPONENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_for_same_distance() {
        let time = RaceTime::from_seconds(1448);
        assert_eq!(
            EquivalenceConverter::convert(time, CanonicalDistance::FiveK, CanonicalDistance::FiveK),
            time
        );
    }

    #[test]
    fn test_doubling_distance() {
        // 20:00 5K → 10K: 1200 × 2^1.06 ≈ 2502 s
        let ten_k = EquivalenceConverter::convert(
            RaceTime::from_seconds(1200),
            CanonicalDistance::FiveK,
            CanonicalDistance::TenK,
        );
        assert!((ten_k.seconds() as i64 - 2502).abs() <= 1);
    }

    #[test]
    fn test_conversion_is_invertible() {
        let there = EquivalenceConverter::convert_seconds(3003.0, 10000.0, 42195.0);
        let back = EquivalenceConverter::convert_seconds(there, 42195.0, 10000.0);
        assert!((back - 3003.0).abs() < 1e-6);
    }

    #[test]
    fn test_longer_distance_is_slower_per_mile() {
        let five_k = RaceTime::from_seconds(1448);
        let marathon = EquivalenceConverter::convert(
            five_k,
            CanonicalDistance::FiveK,
            CanonicalDistance::Marathon,
        );
        let pace_5k = five_k.as_f64() / CanonicalDistance::FiveK.meters();
        let pace_marathon = marathon.as_f64() / CanonicalDistance::Marathon.meters();
        assert!(pace_marathon > pace_5k);
    }

    #[test]
    fn test_degenerate_meters() {
        assert_eq!(EquivalenceConverter::convert_seconds(100.0, 0.0, 5000.0), 100.0);
    }
}
