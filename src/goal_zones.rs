//! Training paces derived from personal records for a goal race
//!
//! Each zone borrows its pace from the record at a source distance. Road goals
//! share one set of sources; each ultra goal shifts the sources longer.

use crate::models::{CanonicalDistance, Pace};
use crate::pr_profile::PrProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named zone of the personal record based pace table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrZone {
    Aerobic,
    Tempo,
    Threshold,
    Interval,
    Repetition,
}

impl PrZone {
    pub const ALL: [PrZone; 5] = [
        PrZone::Aerobic,
        PrZone::Tempo,
        PrZone::Threshold,
        PrZone::Interval,
        PrZone::Repetition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrZone::Aerobic => "aerobic",
            PrZone::Tempo => "tempo",
            PrZone::Threshold => "threshold",
            PrZone::Interval => "interval",
            PrZone::Repetition => "repetition",
        }
    }
}

impl fmt::Display for PrZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Goal race grouping that shares one zone mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTier {
    Road,
    FiftyK,
    FiftyMile,
    HundredK,
    HundredMile,
}

impl GoalTier {
    /// Tier for a goal distance; anything other than an ultra is a road goal
    pub fn for_goal(goal: CanonicalDistance) -> Self {
        match goal {
            CanonicalDistance::FiftyK => GoalTier::FiftyK,
            CanonicalDistance::FiftyMile => GoalTier::FiftyMile,
            CanonicalDistance::HundredK => GoalTier::HundredK,
            CanonicalDistance::HundredMile => GoalTier::HundredMile,
            _ => GoalTier::Road,
        }
    }

    /// Source distances for aerobic, tempo, threshold, interval and repetition
    fn sources(self) -> [CanonicalDistance; 5] {
        use CanonicalDistance::*;
        match self {
            GoalTier::Road => [Marathon, HalfMarathon, TenK, FiveK, Mile],
            GoalTier::FiftyK => [Marathon, FiftyK, HalfMarathon, TenK, FiveK],
            GoalTier::FiftyMile => [Marathon, FiftyMile, FiftyK, HalfMarathon, TenK],
            GoalTier::HundredK => [Marathon, HundredK, FiftyMile, FiftyK, HalfMarathon],
            GoalTier::HundredMile => [Marathon, HundredMile, HundredK, FiftyMile, FiftyK],
        }
    }
}

/// Pace for one zone along with where it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZonePace {
    pub pace: Pace,
    pub source_distance: CanonicalDistance,
    /// True when the source record was projected rather than raced
    pub projected: bool,
}

/// Maps goal races to zone source distances
pub struct GoalZoneMapper;

impl GoalZoneMapper {
    pub fn mapping(goal: CanonicalDistance) -> BTreeMap<PrZone, CanonicalDistance> {
        PrZone::ALL
            .into_iter()
            .zip(GoalTier::for_goal(goal).sources())
            .collect()
    }

    /// Per-mile paces for each zone whose source distance is in the profile
    pub fn paces(goal: CanonicalDistance, profile: &PrProfile) -> BTreeMap<PrZone, ZonePace> {
        Self::mapping(goal)
            .into_iter()
            .filter_map(|(zone, source)| {
                let Some(entry) = profile.get(source) else {
                    tracing::debug!(%zone, %source, "no record for zone source distance");
                    return None;
                };
                Some((
                    zone,
                    ZonePace {
                        pace: Pace::from_race(entry.time, source),
                        source_distance: source,
                        projected: !entry.actual,
                    },
                ))
            })
            .collect()
    }
}
