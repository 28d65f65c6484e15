//! Personal record profiles
//!
//! A profile holds one entry per canonical distance. Distances the runner has
//! raced keep their actual time; every other distance is projected from the
//! longest race supplied.

use crate::error::Result;
use crate::index_chart::{IndexResolver, ProjectionMethod};
use crate::models::{CanonicalDistance, RaceResult};
use crate::time_codec::RaceTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// A recorded or projected personal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrProfileEntry {
    pub distance: CanonicalDistance,
    pub time: RaceTime,
    /// True when the runner actually raced this distance
    pub actual: bool,
    /// Anchor distance a projected entry was derived from; `None` for actual entries
    pub based_on: Option<CanonicalDistance>,
    /// How a projected time was obtained
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ProjectionMethod>,
}

impl PrProfileEntry {
    pub fn actual(distance: CanonicalDistance, time: RaceTime) -> Self {
        Self {
            distance,
            time,
            actual: true,
            based_on: None,
            method: None,
        }
    }

    pub fn is_projected(&self) -> bool {
        !self.actual
    }

    pub fn as_result(&self) -> RaceResult {
        RaceResult {
            distance: self.distance,
            time: self.time,
        }
    }
}

/// Personal records keyed by distance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrProfile {
    entries: BTreeMap<CanonicalDistance, PrProfileEntry>,
}

impl PrProfile {
    pub fn get(&self, distance: CanonicalDistance) -> Option<&PrProfileEntry> {
        self.entries.get(&distance)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PrProfileEntry> {
        self.entries.values()
    }

    /// Entries the runner actually raced, shortest distance first
    pub fn actual_entries(&self) -> impl Iterator<Item = &PrProfileEntry> {
        self.entries.values().filter(|entry| entry.actual)
    }

    pub fn projected_entries(&self) -> impl Iterator<Item = &PrProfileEntry> {
        self.entries.values().filter(|entry| !entry.actual)
    }

    /// The longest actual entry, used to project everything else
    pub fn anchor(&self) -> Option<&PrProfileEntry> {
        self.actual_entries().last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, entry: PrProfileEntry) {
        self.entries.insert(entry.distance, entry);
    }
}

/// Builds [`PrProfile`]s against a chart
#[derive(Debug, Clone, Copy)]
pub struct PrProfileBuilder<'a> {
    resolver: IndexResolver<'a>,
}

impl PrProfileBuilder<'static> {
    pub fn published() -> Self {
        Self::new(IndexResolver::published())
    }
}

impl<'a> PrProfileBuilder<'a> {
    pub fn new(resolver: IndexResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Fill every canonical distance from a partial set of actual records
    ///
    /// Zero-second times are ignored. With no usable records the profile is
    /// empty.
    pub fn build(&self, actuals: &BTreeMap<CanonicalDistance, RaceTime>) -> PrProfile {
        let mut profile = PrProfile::default();
        for (&distance, &time) in actuals {
            if time.is_zero() {
                tracing::debug!(%distance, "ignoring zero time personal record");
                continue;
            }
            profile.insert(PrProfileEntry::actual(distance, time));
        }

        let anchor = match profile.anchor() {
            Some(anchor) => anchor.as_result(),
            None => {
                tracing::debug!("no actual records supplied, profile left empty");
                return profile;
            }
        };
        tracing::debug!(
            anchor = %anchor.distance,
            time = %anchor.time,
            "projecting missing distances from anchor"
        );

        for distance in CanonicalDistance::ALL {
            if profile.get(distance).is_some() {
                continue;
            }
            let projection = self.resolver.project(&anchor, distance);
            profile.insert(PrProfileEntry {
                distance,
                time: projection.time,
                actual: false,
                based_on: Some(anchor.distance),
                method: Some(projection.method),
            });
        }

        profile
    }

    /// Build from race results, the latest result per distance winning
    pub fn build_from_results<'r>(
        &self,
        results: impl IntoIterator<Item = &'r RaceResult>,
    ) -> PrProfile {
        let actuals = results
            .into_iter()
            .map(|result| (result.distance, result.time))
            .collect();
        self.build(&actuals)
    }

    /// Parse distance label and time text pairs, skipping blank times
    pub fn parse_inputs<'s>(
        inputs: impl IntoIterator<Item = (&'s str, &'s str)>,
    ) -> Result<BTreeMap<CanonicalDistance, RaceTime>> {
        let mut actuals = BTreeMap::new();
        for (label, text) in inputs {
            if text.trim().is_empty() {
                continue;
            }
            let distance: CanonicalDistance = label.parse()?;
            let time: RaceTime = text.parse()?;
            actuals.insert(distance, time);
        }
        Ok(actuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GoldenPaceError;

    fn actuals(pairs: &[(CanonicalDistance, &str)]) -> BTreeMap<CanonicalDistance, RaceTime> {
        pairs
            .iter()
            .map(|(distance, time)| (*distance, time.parse().unwrap()))
            .collect()
    }

    #[test]
    fn test_marathon_only_projects_chart_5k() {
        let profile = PrProfileBuilder::published()
            .build(&actuals(&[(CanonicalDistance::Marathon, "3:49:00")]));

        assert_eq!(profile.len(), CanonicalDistance::ALL.len());
        let five_k = profile.get(CanonicalDistance::FiveK).unwrap();
        assert_eq!(five_k.time.to_string(), "24:08");
        assert!(!five_k.actual);
        assert_eq!(five_k.based_on, Some(CanonicalDistance::Marathon));

        let marathon = profile.get(CanonicalDistance::Marathon).unwrap();
        assert!(marathon.actual);
        assert_eq!(marathon.based_on, None);
        assert_eq!(marathon.method, None);
    }

    #[test]
    fn test_anchor_is_longest_actual() {
        let profile = PrProfileBuilder::published().build(&actuals(&[
            (CanonicalDistance::FiveK, "20:00"),
            (CanonicalDistance::HalfMarathon, "1:40:00"),
        ]));

        assert_eq!(profile.anchor().unwrap().distance, CanonicalDistance::HalfMarathon);
        assert_eq!(profile.actual_entries().count(), 2);
        assert!(profile
            .projected_entries()
            .all(|entry| entry.based_on == Some(CanonicalDistance::HalfMarathon)));
        assert_eq!(profile.get(CanonicalDistance::FiveK).unwrap().time.to_string(), "20:00");
    }

    #[test]
    fn test_non_chart_targets_use_equivalence() {
        let profile = PrProfileBuilder::published()
            .build(&actuals(&[(CanonicalDistance::TenK, "50:03")]));

        let fifty_k = profile.get(CanonicalDistance::FiftyK).unwrap();
        assert_eq!(fifty_k.method, Some(ProjectionMethod::Equivalence));
        assert!(fifty_k.time > profile.get(CanonicalDistance::Marathon).unwrap().time);

        let marathon = profile.get(CanonicalDistance::Marathon).unwrap();
        assert!(matches!(marathon.method, Some(ProjectionMethod::Chart { .. })));
    }

    #[test]
    fn test_empty_input_gives_empty_profile() {
        let profile = PrProfileBuilder::published().build(&BTreeMap::new());
        assert!(profile.is_empty());
        assert!(profile.anchor().is_none());

        let zero = actuals(&[(CanonicalDistance::FiveK, "0:00")]);
        assert!(PrProfileBuilder::published().build(&zero).is_empty());
    }

    #[test]
    fn test_parse_inputs() {
        let parsed = PrProfileBuilder::parse_inputs([
            ("5K", "22:30"),
            ("Half Marathon", "  "),
            ("Marathon", "3:30:00"),
        ])
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[&CanonicalDistance::FiveK].seconds(), 1350);

        assert!(matches!(
            PrProfileBuilder::parse_inputs([("3K", "10:00")]),
            Err(GoldenPaceError::UnsupportedDistance { .. })
        ));
        assert!(matches!(
            PrProfileBuilder::parse_inputs([("5K", "22:75")]),
            Err(GoldenPaceError::InvalidTimeFormat(_))
        ));
    }

    #[test]
    fn test_build_from_results() {
        let results = [
            RaceResult::parse("10K", "45:00").unwrap(),
            RaceResult::parse("10K", "44:10").unwrap(),
        ];
        let profile = PrProfileBuilder::published().build_from_results(&results);
        assert_eq!(profile.get(CanonicalDistance::TenK).unwrap().time.to_string(), "44:10");
    }
}
