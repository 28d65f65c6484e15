//! Cross-checks between personal records
//!
//! Every actual record is projected from each of the others. A record that
//! sits far from what the rest of the profile predicts is reported, together
//! with the direction and size of the gap.

use crate::error::{GoldenPaceError, Result};
use crate::index_chart::IndexResolver;
use crate::models::{CanonicalDistance, RaceResult};
use crate::pr_profile::{PrProfile, PrProfileEntry};
use crate::time_codec::RaceTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a record is faster or slower than the rest of the profile predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Faster,
    Slower,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Faster => write!(f, "faster"),
            Direction::Slower => write!(f, "slower"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A record that disagrees with the other records
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsistencyIssue {
    pub distance: CanonicalDistance,
    pub actual_time: RaceTime,
    /// Mean of the times projected from every other actual record
    pub projected_time: RaceTime,
    /// Mean relative gap, `|actual - projected| / projected`
    pub variance: f64,
    pub direction: Direction,
    pub severity: Severity,
}

impl ConsistencyIssue {
    pub fn variance_percent(&self) -> f64 {
        self.variance * 100.0
    }
}

/// Variance fractions above which a record is reported
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for ConsistencyThresholds {
    fn default() -> Self {
        Self {
            medium: 0.05,
            high: 0.10,
        }
    }
}

impl ConsistencyThresholds {
    pub fn new(medium: f64, high: f64) -> Result<Self> {
        if !medium.is_finite() || medium <= 0.0 {
            return Err(GoldenPaceError::invalid_parameter(
                "medium_variance",
                medium,
                "threshold must be a positive fraction",
            ));
        }
        if !high.is_finite() || high < medium {
            return Err(GoldenPaceError::invalid_parameter(
                "high_variance",
                high,
                "high threshold must not be below the medium threshold",
            ));
        }
        Ok(Self { medium, high })
    }

    fn classify(&self, variance: f64) -> Option<Severity> {
        if variance > self.high {
            Some(Severity::High)
        } else if variance > self.medium {
            Some(Severity::Medium)
        } else {
            None
        }
    }
}

/// Which end of the chart a record falls off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonablenessKind {
    /// Faster than the fittest chart row
    VeryFast,
    /// Slower than the least fit chart row
    VerySlow,
}

/// An actual record outside the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReasonablenessIssue {
    pub distance: CanonicalDistance,
    pub time: RaceTime,
    pub kind: ReasonablenessKind,
    /// Chart time at the boundary that was crossed
    pub boundary_time: RaceTime,
}

/// A race time outside the range a runner could realistically record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlausibilityWarning {
    pub distance: CanonicalDistance,
    pub time: RaceTime,
    pub min: RaceTime,
    pub max: RaceTime,
}

impl fmt::Display for PlausibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} is outside the expected range {} to {}",
            self.time, self.distance, self.min, self.max
        )
    }
}

/// Checks personal record profiles against the chart
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyValidator<'a> {
    resolver: IndexResolver<'a>,
    thresholds: ConsistencyThresholds,
}

impl ConsistencyValidator<'static> {
    pub fn published() -> Self {
        Self::new(IndexResolver::published(), ConsistencyThresholds::default())
    }
}

impl<'a> ConsistencyValidator<'a> {
    pub fn new(resolver: IndexResolver<'a>, thresholds: ConsistencyThresholds) -> Self {
        Self {
            resolver,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> ConsistencyThresholds {
        self.thresholds
    }

    /// Report actual records that disagree with the other actual records
    ///
    /// Projected entries are ignored. Fewer than two actual records yield no
    /// issues.
    pub fn check(&self, profile: &PrProfile) -> Vec<ConsistencyIssue> {
        let actuals: Vec<&PrProfileEntry> = profile.actual_entries().collect();
        if actuals.len() < 2 {
            tracing::debug!(actual = actuals.len(), "too few actual records to cross-check");
            return Vec::new();
        }

        let mut issues = Vec::new();
        for entry in &actuals {
            let mut variance_sum = 0.0;
            let mut projected_sum = 0.0;
            let mut compared = 0usize;

            for other in actuals.iter().filter(|other| other.distance != entry.distance) {
                let projected = self
                    .resolver
                    .project(&other.as_result(), entry.distance)
                    .time
                    .as_f64();
                if projected <= 0.0 {
                    continue;
                }
                variance_sum += (entry.time.as_f64() - projected).abs() / projected;
                projected_sum += projected;
                compared += 1;
            }

            if compared == 0 {
                continue;
            }
            let variance = variance_sum / compared as f64;
            let projected = projected_sum / compared as f64;

            if let Some(severity) = self.thresholds.classify(variance) {
                let direction = if entry.time.as_f64() > projected {
                    Direction::Slower
                } else {
                    Direction::Faster
                };
                tracing::debug!(
                    distance = %entry.distance,
                    variance,
                    %direction,
                    %severity,
                    "inconsistent personal record"
                );
                issues.push(ConsistencyIssue {
                    distance: entry.distance,
                    actual_time: entry.time,
                    projected_time: RaceTime::from_seconds_f64(projected),
                    variance,
                    direction,
                    severity,
                });
            }
        }

        issues
    }

    /// Report actual chart-distance records beyond either end of the chart
    pub fn check_reasonableness(&self, profile: &PrProfile) -> Vec<ReasonablenessIssue> {
        let chart = self.resolver.chart();
        let (slowest, fastest) = (chart.slowest(), chart.fastest());

        profile
            .actual_entries()
            .filter_map(|entry| {
                let fastest_time = fastest.time(entry.distance)?;
                let slowest_time = slowest.time(entry.distance)?;
                let (kind, boundary_time) = if entry.time < fastest_time {
                    (ReasonablenessKind::VeryFast, fastest_time)
                } else if entry.time > slowest_time {
                    (ReasonablenessKind::VerySlow, slowest_time)
                } else {
                    return None;
                };
                Some(ReasonablenessIssue {
                    distance: entry.distance,
                    time: entry.time,
                    kind,
                    boundary_time,
                })
            })
            .collect()
    }

    /// Warn when a result falls outside the realistic range for its distance
    pub fn check_plausibility(result: &RaceResult) -> Option<PlausibilityWarning> {
        let (min, max) = result.distance.plausible_range()?;
        if result.time >= min && result.time <= max {
            return None;
        }
        Some(PlausibilityWarning {
            distance: result.distance,
            time: result.time,
            min,
            max,
        })
    }
}
