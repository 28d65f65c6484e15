//! Calculation context bundling the reference datasets
//!
//! A [`PaceEngine`] owns no per-runner state. It carries the chart, the zone
//! table and the consistency thresholds, and every call takes the runner's
//! data as input.

use crate::consistency::{
    ConsistencyIssue, ConsistencyThresholds, ConsistencyValidator, PlausibilityWarning,
    ReasonablenessIssue,
};
use crate::error::Result;
use crate::goal_zones::{GoalZoneMapper, PrZone, ZonePace};
use crate::index_chart::IndexResolver;
use crate::models::{CanonicalDistance, FitnessIndex, RaceResult};
use crate::pr_profile::{PrProfile, PrProfileBuilder};
use crate::progression::{Progression, ProgressionProjector};
use crate::time_codec::RaceTime;
use crate::zones::{ZonePaces, ZoneTable};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything derived from a single race result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub result: RaceResult,
    pub index: FitnessIndex,
    pub paces: ZonePaces,
    pub predictions: BTreeMap<CanonicalDistance, RaceTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plausibility: Option<PlausibilityWarning>,
}

/// Personal record analysis for a goal race
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub goal: CanonicalDistance,
    pub profile: PrProfile,
    pub zone_paces: BTreeMap<PrZone, ZonePace>,
    pub issues: Vec<ConsistencyIssue>,
    pub reasonableness: Vec<ReasonablenessIssue>,
}

/// Shared, read-only calculation context
#[derive(Debug, Clone, Copy)]
pub struct PaceEngine<'a> {
    resolver: IndexResolver<'a>,
    zones: &'a ZoneTable,
    thresholds: ConsistencyThresholds,
}

impl PaceEngine<'static> {
    /// Engine over the published chart and zone table
    pub fn published() -> Self {
        Self::new(
            IndexResolver::published(),
            ZoneTable::published(),
            ConsistencyThresholds::default(),
        )
    }
}

impl Default for PaceEngine<'static> {
    fn default() -> Self {
        Self::published()
    }
}

impl<'a> PaceEngine<'a> {
    pub fn new(
        resolver: IndexResolver<'a>,
        zones: &'a ZoneTable,
        thresholds: ConsistencyThresholds,
    ) -> Self {
        Self {
            resolver,
            zones,
            thresholds,
        }
    }

    pub fn with_thresholds(mut self, thresholds: ConsistencyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn resolver(&self) -> IndexResolver<'a> {
        self.resolver
    }

    pub fn zones(&self) -> &'a ZoneTable {
        self.zones
    }

    fn validator(&self) -> ConsistencyValidator<'a> {
        ConsistencyValidator::new(self.resolver, self.thresholds)
    }

    fn builder(&self) -> PrProfileBuilder<'a> {
        PrProfileBuilder::new(self.resolver)
    }

    /// Index, training paces and race predictions for one result
    pub fn calculate(&self, result: &RaceResult) -> Calculation {
        let plausibility = ConsistencyValidator::check_plausibility(result);
        if let Some(warning) = &plausibility {
            tracing::warn!(%warning, "implausible race time");
        }

        let index = self.resolver.from_result(result);
        tracing::info!(
            distance = %result.distance,
            time = %result.time,
            %index,
            "calculated fitness index"
        );

        Calculation {
            result: *result,
            index,
            paces: self.zones.paces_for(index),
            predictions: self.resolver.predictions(index),
            plausibility,
        }
    }

    /// Parse a distance label and time text, then calculate
    pub fn calculate_text(&self, distance: &str, time: &str) -> Result<Calculation> {
        let result = RaceResult::parse(distance, time)?;
        Ok(self.calculate(&result))
    }

    pub fn build_profile(&self, actuals: &BTreeMap<CanonicalDistance, RaceTime>) -> PrProfile {
        self.builder().build(actuals)
    }

    pub fn check_consistency(&self, profile: &PrProfile) -> Vec<ConsistencyIssue> {
        self.validator().check(profile)
    }

    /// Build a profile, derive goal paces and run every profile check
    pub fn analyze_profile(
        &self,
        actuals: &BTreeMap<CanonicalDistance, RaceTime>,
        goal: CanonicalDistance,
    ) -> ProfileReport {
        let profile = self.build_profile(actuals);
        let validator = self.validator();
        let issues = validator.check(&profile);
        let reasonableness = validator.check_reasonableness(&profile);
        if !issues.is_empty() {
            tracing::info!(count = issues.len(), "personal records are inconsistent");
        }

        ProfileReport {
            goal,
            zone_paces: GoalZoneMapper::paces(goal, &profile),
            profile,
            issues,
            reasonableness,
        }
    }

    pub fn project_progression(
        &self,
        start_index: FitnessIndex,
        start_date: NaiveDate,
        weekly_mileage: f64,
        horizon_weeks: u32,
        step_weeks: u32,
    ) -> Result<Progression> {
        ProgressionProjector::project(
            start_index,
            start_date,
            weekly_mileage,
            horizon_weeks,
            step_weeks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::Severity;
    use crate::error::GoldenPaceError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculate_five_k() {
        let engine = PaceEngine::published();
        let calculation = engine.calculate_text("5K", "24:08").unwrap();

        assert_eq!(calculation.index.value(), dec!(40.0));
        assert_eq!(calculation.paces.easy.to_string(), "9:50");
        assert_eq!(calculation.paces.threshold.to_string(), "8:12");
        assert_eq!(
            calculation.predictions[&CanonicalDistance::Marathon].to_string(),
            "3:49:00"
        );
        assert!(calculation.plausibility.is_none());
    }

    #[test]
    fn test_calculate_flags_implausible_time() {
        let calculation = PaceEngine::published().calculate_text("5K", "14:10").unwrap();
        assert!(calculation.plausibility.is_some());
        assert!(calculation.index.as_f64() > 70.0);
    }

    #[test]
    fn test_calculate_text_errors() {
        let engine = PaceEngine::default();
        assert!(matches!(
            engine.calculate_text("5K", "24:61"),
            Err(GoldenPaceError::InvalidTimeFormat(_))
        ));
        assert!(matches!(
            engine.calculate_text("3000m", "9:00"),
            Err(GoldenPaceError::UnsupportedDistance { .. })
        ));
    }

    #[test]
    fn test_analyze_profile() {
        let actuals = [
            (CanonicalDistance::FiveK, RaceTime::hms(0, 20, 0)),
            (CanonicalDistance::Marathon, RaceTime::hms(4, 49, 0)),
        ]
        .into_iter()
        .collect();
        let report = PaceEngine::published().analyze_profile(&actuals, CanonicalDistance::HalfMarathon);

        assert_eq!(report.profile.actual_entries().count(), 2);
        assert!(report.issues.iter().any(|issue| issue.severity == Severity::High));
        assert!(report.reasonableness.is_empty());
        assert_eq!(report.zone_paces.len(), 5);
        assert!(report.zone_paces[&PrZone::Tempo].projected);
    }

    #[test]
    fn test_engine_thresholds_are_applied() {
        let actuals = [
            (CanonicalDistance::FiveK, RaceTime::hms(0, 24, 8)),
            (CanonicalDistance::TenK, RaceTime::hms(0, 53, 0)),
        ]
        .into_iter()
        .collect();
        let strict = PaceEngine::published();
        let lenient = strict.with_thresholds(ConsistencyThresholds::new(0.5, 0.9).unwrap());

        let profile = strict.build_profile(&actuals);
        assert!(!strict.check_consistency(&profile).is_empty());
        assert!(lenient.check_consistency(&profile).is_empty());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PaceEngine<'static>>();

        let engine = PaceEngine::published();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(move || {
                    engine.calculate_text("10K", "50:03").map(|c| c.index.value())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), dec!(40.0));
        }
    }
}
