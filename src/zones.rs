//! Training pace zones by fitness index
//!
//! The published table lists easy and threshold paces per mile and interval
//! and repetition paces per 400m lap. Lap paces are normalised to seconds per
//! mile when the table is loaded, so every [`Pace`] leaving this module is per
//! mile.

use crate::error::{GoldenPaceError, Result};
use crate::models::{FitnessIndex, Pace, MAX_INDEX, METERS_PER_MILE, MIN_INDEX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Named training intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Easy,
    Threshold,
    Interval,
    Repetition,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Easy, Zone::Threshold, Zone::Interval, Zone::Repetition];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Easy => "easy",
            Zone::Threshold => "threshold",
            Zone::Interval => "interval",
            Zone::Repetition => "repetition",
        }
    }

    /// Whether the zone is usually prescribed as 400m repeats
    pub fn is_track_zone(self) -> bool {
        matches!(self, Zone::Interval | Zone::Repetition)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One pace per zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonePaces {
    pub easy: Pace,
    pub threshold: Pace,
    pub interval: Pace,
    pub repetition: Pace,
}

impl ZonePaces {
    pub fn get(&self, zone: Zone) -> Pace {
        match zone {
            Zone::Easy => self.easy,
            Zone::Threshold => self.threshold,
            Zone::Interval => self.interval,
            Zone::Repetition => self.repetition,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, Pace)> + '_ {
        Zone::ALL.iter().map(move |&zone| (zone, self.get(zone)))
    }

    pub fn to_map(&self) -> BTreeMap<Zone, Pace> {
        self.iter().collect()
    }

    fn interpolate(&self, other: &ZonePaces, fraction: f64) -> ZonePaces {
        ZonePaces {
            easy: self.easy.interpolate(&other.easy, fraction),
            threshold: self.threshold.interpolate(&other.threshold, fraction),
            interval: self.interval.interpolate(&other.interval, fraction),
            repetition: self.repetition.interpolate(&other.repetition, fraction),
        }
    }
}

/// Paces at a whole-number index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneTableRow {
    pub index: u8,
    pub paces: ZonePaces,
}

const fn ms(minutes: u32, seconds: u32) -> u32 {
    minutes * 60 + seconds
}

/// Published table: (index, easy/mile, threshold/mile, interval/400m, repetition/400m)
const PUBLISHED_ZONES: [(u8, u32, u32, u32, u32); 49] = [
    (30, ms(12, 16), ms(10, 18), ms(2, 22), ms(2, 16)),
    (32, ms(11, 41), ms(9, 47), ms(2, 14), ms(2, 8)),
    (34, ms(11, 9), ms(9, 20), ms(2, 8), ms(2, 2)),
    (36, ms(10, 40), ms(8, 55), ms(2, 2), ms(1, 55)),
    (38, ms(10, 14), ms(8, 33), ms(1, 56), ms(1, 50)),
    (40, ms(9, 50), ms(8, 12), ms(1, 52), ms(1, 46)),
    (42, ms(9, 28), ms(7, 52), ms(1, 48), ms(1, 42)),
    (44, ms(9, 7), ms(7, 33), ms(1, 44), ms(1, 38)),
    (45, ms(8, 58), ms(7, 25), ms(1, 42), ms(1, 36)),
    (46, ms(8, 48), ms(7, 17), ms(1, 40), ms(1, 34)),
    (47, ms(8, 39), ms(7, 10), ms(1, 38), ms(1, 32)),
    (48, ms(8, 31), ms(7, 2), ms(1, 36), ms(1, 30)),
    (49, ms(8, 22), ms(6, 55), ms(1, 35), ms(1, 29)),
    (50, ms(8, 14), ms(6, 51), ms(1, 33), ms(1, 27)),
    (51, ms(8, 7), ms(6, 44), ms(1, 32), ms(1, 26)),
    (52, ms(7, 59), ms(6, 38), ms(1, 31), ms(1, 25)),
    (53, ms(7, 52), ms(6, 32), ms(1, 30), ms(1, 24)),
    (54, ms(7, 45), ms(6, 26), ms(1, 28), ms(1, 22)),
    (55, ms(7, 38), ms(6, 20), ms(1, 27), ms(1, 21)),
    (56, ms(7, 31), ms(6, 15), ms(1, 26), ms(1, 20)),
    (57, ms(7, 25), ms(6, 9), ms(1, 25), ms(1, 19)),
    (58, ms(7, 19), ms(6, 4), ms(1, 23), ms(1, 17)),
    (59, ms(7, 13), ms(5, 59), ms(1, 22), ms(1, 16)),
    (60, ms(7, 7), ms(5, 54), ms(1, 21), ms(1, 15)),
    (61, ms(7, 1), ms(5, 50), ms(1, 20), ms(1, 14)),
    (62, ms(6, 56), ms(5, 45), ms(1, 19), ms(1, 13)),
    (63, ms(6, 50), ms(5, 41), ms(1, 18), ms(1, 12)),
    (64, ms(6, 45), ms(5, 36), ms(1, 17), ms(1, 11)),
    (65, ms(6, 40), ms(5, 32), ms(1, 16), ms(1, 10)),
    (66, ms(6, 35), ms(5, 28), ms(1, 15), ms(1, 9)),
    (67, ms(6, 30), ms(5, 24), ms(1, 14), ms(1, 8)),
    (68, ms(6, 26), ms(5, 20), ms(1, 13), ms(1, 7)),
    (69, ms(6, 21), ms(5, 16), ms(1, 12), ms(1, 6)),
    (70, ms(6, 17), ms(5, 13), ms(1, 11), ms(1, 5)),
    (71, ms(6, 12), ms(5, 9), ms(1, 10), ms(1, 4)),
    (72, ms(6, 8), ms(5, 5), ms(1, 9), ms(1, 3)),
    (73, ms(6, 4), ms(5, 2), ms(1, 9), ms(1, 2)),
    (74, ms(6, 0), ms(4, 59), ms(1, 8), ms(1, 2)),
    (75, ms(5, 56), ms(4, 56), ms(1, 7), ms(1, 1)),
    (76, ms(5, 52), ms(4, 52), ms(1, 6), ms(1, 0)),
    (77, ms(5, 48), ms(4, 49), ms(1, 5), ms(0, 59)),
    (78, ms(5, 45), ms(4, 46), ms(1, 5), ms(0, 59)),
    (79, ms(5, 41), ms(4, 43), ms(1, 4), ms(0, 58)),
    (80, ms(5, 38), ms(4, 41), ms(1, 4), ms(0, 58)),
    (81, ms(5, 34), ms(4, 38), ms(1, 3), ms(0, 57)),
    (82, ms(5, 31), ms(4, 35), ms(1, 2), ms(0, 56)),
    (83, ms(5, 28), ms(4, 32), ms(1, 2), ms(0, 56)),
    (84, ms(5, 25), ms(4, 30), ms(1, 1), ms(0, 55)),
    (85, ms(5, 21), ms(4, 27), ms(1, 1), ms(0, 55)),
];

static PUBLISHED_TABLE: OnceLock<ZoneTable> = OnceLock::new();

/// Laps of 400m in a mile
fn laps_per_mile() -> f64 {
    METERS_PER_MILE / 400.0
}

/// Validated, index-sorted pace table
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    rows: Vec<ZoneTableRow>,
}

impl ZoneTable {
    /// The published table, loaded on first use and shared afterwards
    pub fn published() -> &'static ZoneTable {
        PUBLISHED_TABLE.get_or_init(|| {
            let laps = laps_per_mile();
            let rows = PUBLISHED_ZONES
                .iter()
                .map(|&(index, easy, threshold, interval, repetition)| ZoneTableRow {
                    index,
                    paces: ZonePaces {
                        easy: Pace::Point(easy as f64),
                        threshold: Pace::Point(threshold as f64),
                        interval: Pace::Point(interval as f64 * laps),
                        repetition: Pace::Point(repetition as f64 * laps),
                    },
                })
                .collect();
            ZoneTable { rows }
        })
    }

    /// Validate and build a table from rows
    ///
    /// Rows must be sorted by strictly increasing index within [30, 85], every
    /// range must satisfy `lo <= hi`, and no zone may get slower as the index
    /// rises.
    pub fn new(rows: Vec<ZoneTableRow>) -> Result<Self> {
        if rows.len() < 2 {
            return Err(GoldenPaceError::invalid_parameter(
                "rows",
                rows.len(),
                "a zone table needs at least two rows",
            ));
        }

        for row in &rows {
            let index = row.index as f64;
            if !(MIN_INDEX..=MAX_INDEX).contains(&index) {
                return Err(GoldenPaceError::OutOfRangeIndex { value: index });
            }
            for (zone, pace) in row.paces.iter() {
                if !pace.lo().is_finite() || pace.lo() <= 0.0 || pace.lo() > pace.hi() {
                    return Err(GoldenPaceError::invalid_parameter(
                        zone.name(),
                        row.index,
                        "paces must be positive with lo <= hi",
                    ));
                }
            }
        }

        for pair in rows.windows(2) {
            if pair[1].index <= pair[0].index {
                return Err(GoldenPaceError::invalid_parameter(
                    "rows",
                    pair[1].index,
                    "zone rows must be sorted by strictly increasing index",
                ));
            }
            for zone in Zone::ALL {
                let slower = pair[0].paces.get(zone);
                let faster = pair[1].paces.get(zone);
                if faster.lo() > slower.lo() || faster.hi() > slower.hi() {
                    return Err(GoldenPaceError::invalid_parameter(
                        zone.name(),
                        pair[1].index,
                        "paces must not slow down as the index rises",
                    ));
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ZoneTableRow] {
        &self.rows
    }

    /// Paces for a raw index value
    ///
    /// Values outside [30, 85] are clamped with a warning.
    pub fn paces(&self, index: f64) -> ZonePaces {
        self.paces_for(FitnessIndex::clamped(index))
    }

    /// Paces for a fitness index, interpolating every zone independently
    pub fn paces_for(&self, index: FitnessIndex) -> ZonePaces {
        let wanted = index.as_f64();
        let rows = &self.rows;
        let position = rows.partition_point(|row| (row.index as f64) < wanted);

        if position == rows.len() {
            return rows[rows.len() - 1].paces;
        }
        if position == 0 || rows[position].index as f64 == wanted {
            return rows[position].paces;
        }

        let lower = &rows[position - 1];
        let upper = &rows[position];
        let fraction = (wanted - lower.index as f64) / (upper.index as f64 - lower.index as f64);

        lower.paces.interpolate(&upper.paces, fraction)
    }
}
