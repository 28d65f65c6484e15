//! Fitness index progression over a training block
//!
//! Growth is linear in elapsed weeks. The weekly gain starts from one sixth of
//! an index point, scaled by training volume and by how fit the runner already
//! is; none of these constants are configurable.

use crate::error::{GoldenPaceError, Result};
use crate::models::{FitnessIndex, MAX_INDEX};
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Index points gained per week at the reference volume and index
pub const BASE_WEEKLY_GAIN: f64 = 1.0 / 6.0;

/// Weekly mileage at which the volume factor is 1.0
pub const REFERENCE_WEEKLY_MILEAGE: f64 = 40.0;

/// Index at which gains start to diminish
pub const REFERENCE_INDEX: f64 = 40.0;

const MILEAGE_FACTOR_BOUNDS: (f64, f64) = (0.7, 1.2);
const DIMINISHING_FACTOR_BOUNDS: (f64, f64) = (0.5, 1.0);
const DIMINISHING_RATE: f64 = 0.01;

/// One projected point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressionPoint {
    pub week_offset: u32,
    pub date: NaiveDate,
    pub index: FitnessIndex,
}

/// Projects fitness index growth
pub struct ProgressionProjector;

impl ProgressionProjector {
    /// Index points gained per week
    pub fn weekly_increment(start_index: FitnessIndex, weekly_mileage: f64) -> f64 {
        let (mileage_lo, mileage_hi) = MILEAGE_FACTOR_BOUNDS;
        let (diminishing_lo, diminishing_hi) = DIMINISHING_FACTOR_BOUNDS;

        let mileage_factor = (weekly_mileage / REFERENCE_WEEKLY_MILEAGE).clamp(mileage_lo, mileage_hi);
        let diminishing_factor = (1.0 - (start_index.as_f64() - REFERENCE_INDEX) * DIMINISHING_RATE)
            .clamp(diminishing_lo, diminishing_hi);

        BASE_WEEKLY_GAIN * mileage_factor * diminishing_factor
    }

    /// Plan a progression from `start_index` on `start_date`
    ///
    /// One point every `step_weeks` from week 0 through `horizon_weeks`
    /// inclusive. The returned [`Progression`] can be iterated any number of
    /// times.
    pub fn project(
        start_index: FitnessIndex,
        start_date: NaiveDate,
        weekly_mileage: f64,
        horizon_weeks: u32,
        step_weeks: u32,
    ) -> Result<Progression> {
        if step_weeks == 0 {
            return Err(GoldenPaceError::invalid_parameter(
                "step_weeks",
                step_weeks,
                "step must be at least one week",
            ));
        }
        if !weekly_mileage.is_finite() || weekly_mileage < 0.0 {
            return Err(GoldenPaceError::invalid_parameter(
                "weekly_mileage",
                weekly_mileage,
                "weekly mileage must be a non-negative number",
            ));
        }
        let horizon_days = u64::from(horizon_weeks) * 7;
        if start_date.checked_add_days(Days::new(horizon_days)).is_none() {
            return Err(GoldenPaceError::invalid_parameter(
                "horizon_weeks",
                horizon_weeks,
                "horizon runs past the last representable date",
            ));
        }

        let weekly_increment = Self::weekly_increment(start_index, weekly_mileage);
        tracing::debug!(
            start = %start_index,
            weekly_mileage,
            weekly_increment,
            horizon_weeks,
            step_weeks,
            "projecting progression"
        );

        Ok(Progression {
            start_index,
            start_date,
            weekly_increment,
            horizon_weeks,
            step_weeks,
        })
    }
}

/// A finite, restartable series of [`ProgressionPoint`]s
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    start_index: FitnessIndex,
    start_date: NaiveDate,
    weekly_increment: f64,
    horizon_weeks: u32,
    step_weeks: u32,
}

impl Progression {
    pub fn weekly_increment(&self) -> f64 {
        self.weekly_increment
    }

    pub fn len(&self) -> usize {
        (self.horizon_weeks / self.step_weeks) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Point at a given week offset
    pub fn point_at(&self, week_offset: u32) -> Option<ProgressionPoint> {
        if week_offset > self.horizon_weeks {
            return None;
        }
        let date = self
            .start_date
            .checked_add_days(Days::new(u64::from(week_offset) * 7))?;
        let raw = self.start_index.as_f64() + f64::from(week_offset) * self.weekly_increment;

        Some(ProgressionPoint {
            week_offset,
            date,
            index: FitnessIndex::clamped(raw.min(MAX_INDEX)),
        })
    }

    /// Final point of the horizon sampled by the step
    pub fn last(&self) -> Option<ProgressionPoint> {
        self.iter().last()
    }

    /// Start a fresh pass over the points
    pub fn iter(&self) -> ProgressionIter<'_> {
        ProgressionIter {
            progression: self,
            next_week: Some(0),
        }
    }
}

/// Iterator over a [`Progression`]
#[derive(Debug, Clone)]
pub struct ProgressionIter<'a> {
    progression: &'a Progression,
    next_week: Option<u32>,
}

impl Iterator for ProgressionIter<'_> {
    type Item = ProgressionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let week = self.next_week?;
        let point = self.progression.point_at(week);
        self.next_week = week
            .checked_add(self.progression.step_weeks)
            .filter(|next| *next <= self.progression.horizon_weeks);
        point
    }
}

impl<'a> IntoIterator for &'a Progression {
    type Item = ProgressionPoint;
    type IntoIter = ProgressionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn index(value: rust_decimal::Decimal) -> FitnessIndex {
        FitnessIndex::new(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_increment_factors() {
        // Low volume hits the 0.7 floor
        let low = ProgressionProjector::weekly_increment(index(dec!(40)), 20.0);
        assert!((low - 0.7 / 6.0).abs() < 1e-12);

        // High volume caps at 1.2; index 60 diminishes to 0.8
        let high = ProgressionProjector::weekly_increment(index(dec!(60)), 50.0);
        assert!((high - 1.2 * 0.8 / 6.0).abs() < 1e-12);

        // Beginners are not boosted above the baseline
        let beginner = ProgressionProjector::weekly_increment(index(dec!(30)), 40.0);
        assert!((beginner - 1.0 / 6.0).abs() < 1e-12);

        // Diminishing factor bottoms out at 0.5
        let elite = ProgressionProjector::weekly_increment(index(dec!(85)), 40.0);
        assert!((elite - 0.5 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_block() {
        let progression =
            ProgressionProjector::project(index(dec!(40)), date(2024, 1, 1), 20.0, 26, 2).unwrap();
        let points: Vec<_> = progression.iter().collect();

        assert_eq!(points.len(), 14);
        assert_eq!(progression.len(), 14);
        assert_eq!(points[0].week_offset, 0);
        assert_eq!(points[0].index.value(), dec!(40.0));
        assert_eq!(points[0].date, date(2024, 1, 1));

        assert_eq!(points[1].week_offset, 2);
        assert_eq!(points[1].index.value(), dec!(40.2));
        assert_eq!(points[1].date, date(2024, 1, 15));

        let last = points[13];
        assert_eq!(last.week_offset, 26);
        assert_eq!(last.index.value(), dec!(43.0));
        assert_eq!(last.date, date(2024, 7, 1));
    }

    #[test]
    fn test_growth_is_linear() {
        let progression =
            ProgressionProjector::project(index(dec!(60)), date(2024, 3, 4), 50.0, 10, 5).unwrap();
        let values: Vec<_> = progression.iter().map(|p| p.index.value()).collect();
        assert_eq!(values, vec![dec!(60.0), dec!(60.8), dec!(61.6)]);
    }

    #[test]
    fn test_caps_at_max_index() {
        let progression =
            ProgressionProjector::project(index(dec!(84.5)), date(2024, 1, 1), 40.0, 26, 13).unwrap();
        let last = progression.last().unwrap();
        assert_eq!(last.index, FitnessIndex::max());
        assert!(progression.iter().all(|p| p.index <= FitnessIndex::max()));
    }

    #[test]
    fn test_restartable() {
        let progression =
            ProgressionProjector::project(index(dec!(45)), date(2024, 1, 1), 30.0, 12, 3).unwrap();
        let first: Vec<_> = progression.iter().collect();
        let second: Vec<_> = (&progression).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_horizon_not_multiple_of_step() {
        let progression =
            ProgressionProjector::project(index(dec!(45)), date(2024, 1, 1), 30.0, 7, 3).unwrap();
        let weeks: Vec<_> = progression.iter().map(|p| p.week_offset).collect();
        assert_eq!(weeks, vec![0, 3, 6]);

        let single =
            ProgressionProjector::project(index(dec!(45)), date(2024, 1, 1), 30.0, 0, 4).unwrap();
        assert_eq!(single.iter().count(), 1);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let start = index(dec!(45));
        assert!(matches!(
            ProgressionProjector::project(start, date(2024, 1, 1), 30.0, 26, 0),
            Err(GoldenPaceError::InvalidParameter { .. })
        ));
        assert!(ProgressionProjector::project(start, date(2024, 1, 1), f64::NAN, 26, 2).is_err());
        assert!(ProgressionProjector::project(start, date(2024, 1, 1), -5.0, 26, 2).is_err());
        assert!(ProgressionProjector::project(start, NaiveDate::MAX, 30.0, 26, 2).is_err());
    }
}
