//! Core value types shared by every calculator

use crate::error::{GoldenPaceError, Result};
use crate::time_codec::{format_seconds, RaceTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lowest index on the published chart
pub const MIN_INDEX: f64 = 30.0;

/// Highest index on the published chart
pub const MAX_INDEX: f64 = 85.0;

/// Miles per meter, as used for every per-mile pace
pub const MILES_PER_METER: f64 = 0.000621371;

/// Meters in a statute mile, used to scale track splits
pub const METERS_PER_MILE: f64 = 1609.344;

/// Race distances recognised by the engine, ordered shortest to longest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalDistance {
    M100,
    M200,
    M400,
    M800,
    M1500,
    Mile,
    FiveK,
    TenK,
    FifteenK,
    TenMile,
    HalfMarathon,
    Marathon,
    FiftyK,
    FiftyMile,
    HundredK,
    HundredMile,
}

impl CanonicalDistance {
    /// Every canonical distance, shortest first
    pub const ALL: [CanonicalDistance; 16] = [
        CanonicalDistance::M100,
        CanonicalDistance::M200,
        CanonicalDistance::M400,
        CanonicalDistance::M800,
        CanonicalDistance::M1500,
        CanonicalDistance::Mile,
        CanonicalDistance::FiveK,
        CanonicalDistance::TenK,
        CanonicalDistance::FifteenK,
        CanonicalDistance::TenMile,
        CanonicalDistance::HalfMarathon,
        CanonicalDistance::Marathon,
        CanonicalDistance::FiftyK,
        CanonicalDistance::FiftyMile,
        CanonicalDistance::HundredK,
        CanonicalDistance::HundredMile,
    ];

    /// The five distances present in every chart row
    pub const CHART: [CanonicalDistance; 5] = [
        CanonicalDistance::Mile,
        CanonicalDistance::FiveK,
        CanonicalDistance::TenK,
        CanonicalDistance::HalfMarathon,
        CanonicalDistance::Marathon,
    ];

    /// Length in meters
    pub fn meters(self) -> f64 {
        match self {
            CanonicalDistance::M100 => 100.0,
            CanonicalDistance::M200 => 200.0,
            CanonicalDistance::M400 => 400.0,
            CanonicalDistance::M800 => 800.0,
            CanonicalDistance::M1500 => 1500.0,
            CanonicalDistance::Mile => 1609.34,
            CanonicalDistance::FiveK => 5000.0,
            CanonicalDistance::TenK => 10000.0,
            CanonicalDistance::FifteenK => 15000.0,
            CanonicalDistance::TenMile => 16093.4,
            CanonicalDistance::HalfMarathon => 21097.0,
            CanonicalDistance::Marathon => 42195.0,
            CanonicalDistance::FiftyK => 50000.0,
            CanonicalDistance::FiftyMile => 80467.0,
            CanonicalDistance::HundredK => 100000.0,
            CanonicalDistance::HundredMile => 160934.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalDistance::M100 => "100m",
            CanonicalDistance::M200 => "200m",
            CanonicalDistance::M400 => "400m",
            CanonicalDistance::M800 => "800m",
            CanonicalDistance::M1500 => "1500m",
            CanonicalDistance::Mile => "Mile",
            CanonicalDistance::FiveK => "5K",
            CanonicalDistance::TenK => "10K",
            CanonicalDistance::FifteenK => "15K",
            CanonicalDistance::TenMile => "10 Mile",
            CanonicalDistance::HalfMarathon => "Half Marathon",
            CanonicalDistance::Marathon => "Marathon",
            CanonicalDistance::FiftyK => "50K",
            CanonicalDistance::FiftyMile => "50 Mile",
            CanonicalDistance::HundredK => "100K",
            CanonicalDistance::HundredMile => "100 Mile",
        }
    }

    /// Whether the published chart carries a column for this distance
    pub fn is_chart_distance(self) -> bool {
        Self::CHART.contains(&self)
    }

    pub fn is_ultra(self) -> bool {
        self > CanonicalDistance::Marathon
    }

    /// Look up a distance by its exact length in meters
    pub fn from_meters(meters: f64) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| (d.meters() - meters).abs() < 0.01)
            .ok_or_else(|| GoldenPaceError::UnsupportedDistance {
                name: format!("{} m", meters),
            })
    }

    /// Range of times a runner could realistically record at this distance
    ///
    /// Only the distances offered by the single-result calculator carry a range.
    pub fn plausible_range(self) -> Option<(RaceTime, RaceTime)> {
        let minutes = |lo: u32, hi: u32| Some((RaceTime::hms(0, lo, 0), RaceTime::hms(0, hi, 0)));
        match self {
            CanonicalDistance::Mile => minutes(4, 30),
            CanonicalDistance::FiveK => minutes(15, 60),
            CanonicalDistance::TenK => minutes(30, 120),
            CanonicalDistance::FifteenK => minutes(45, 180),
            CanonicalDistance::TenMile => minutes(60, 240),
            CanonicalDistance::HalfMarathon => minutes(75, 300),
            CanonicalDistance::Marathon => minutes(150, 600),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CanonicalDistance {
    type Err = GoldenPaceError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if let Some(found) = Self::ALL
            .iter()
            .copied()
            .find(|d| d.label().to_lowercase() == wanted)
        {
            return Ok(found);
        }

        match wanted.as_str() {
            "1 mile" | "1mile" | "mi" => Ok(CanonicalDistance::Mile),
            "half" | "hm" | "half-marathon" => Ok(CanonicalDistance::HalfMarathon),
            "full" | "full marathon" => Ok(CanonicalDistance::Marathon),
            _ => Err(GoldenPaceError::UnsupportedDistance {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl Serialize for CanonicalDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CanonicalDistance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// A recorded race result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub distance: CanonicalDistance,
    pub time: RaceTime,
}

impl RaceResult {
    /// Create a result; a zero time cannot describe a race
    pub fn new(distance: CanonicalDistance, time: RaceTime) -> Result<Self> {
        if time.is_zero() {
            return Err(GoldenPaceError::invalid_parameter(
                "time",
                time,
                "race time must be positive",
            ));
        }
        Ok(Self { distance, time })
    }

    /// Parse a result from a distance label and time text
    pub fn parse(distance: &str, time: &str) -> Result<Self> {
        let distance = distance.parse()?;
        let time = time.parse::<RaceTime>()?;
        Self::new(distance, time)
    }

    /// Average pace over the race
    pub fn pace(&self) -> Pace {
        Pace::from_race(self.time, self.distance)
    }
}

/// Aerobic fitness on the published chart scale, one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FitnessIndex(Decimal);

impl FitnessIndex {
    /// Strict constructor: rejects values outside [30, 85]
    pub fn new(value: Decimal) -> Result<Self> {
        let rounded = round_one_place(value);
        let as_f64 = rounded.to_f64().unwrap_or(f64::NAN);
        if !(MIN_INDEX..=MAX_INDEX).contains(&as_f64) {
            return Err(GoldenPaceError::OutOfRangeIndex { value: as_f64 });
        }
        Ok(Self(rounded))
    }

    /// Strict constructor from a float
    pub fn from_f64(value: f64) -> Result<Self> {
        let decimal = Decimal::from_f64(value)
            .ok_or(GoldenPaceError::OutOfRangeIndex { value })?;
        Self::new(decimal)
    }

    /// Round to one decimal and clamp into [30, 85], logging when clamping occurred
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            tracing::warn!(value, "non-finite fitness index, clamping to {}", MIN_INDEX);
            return Self::min();
        }
        if value < MIN_INDEX || value > MAX_INDEX {
            tracing::warn!(
                value,
                min = MIN_INDEX,
                max = MAX_INDEX,
                "fitness index outside chart range, clamping"
            );
        }
        let bounded = value.clamp(MIN_INDEX, MAX_INDEX);
        let decimal = Decimal::from_f64(bounded).unwrap_or(Decimal::from(30));
        Self(round_one_place(decimal))
    }

    pub fn min() -> Self {
        Self(Decimal::new(300, 1))
    }

    pub fn max() -> Self {
        Self(Decimal::new(850, 1))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(MIN_INDEX)
    }
}

fn round_one_place(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded
}

impl TryFrom<Decimal> for FitnessIndex {
    type Error = GoldenPaceError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FitnessIndex> for Decimal {
    fn from(index: FitnessIndex) -> Self {
        index.0
    }
}

impl fmt::Display for FitnessIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A training pace in seconds per mile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    /// A single target pace
    Point(f64),
    /// A band of paces, `lo` (faster) to `hi` (slower)
    Range { lo: f64, hi: f64 },
}

impl Pace {
    /// Build a range, rejecting inverted or non-finite bounds
    pub fn range(lo: f64, hi: f64) -> Result<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
            return Err(GoldenPaceError::invalid_parameter(
                "pace_range",
                format!("{}-{}", lo, hi),
                "range bounds must be positive with lo <= hi",
            ));
        }
        Ok(Pace::Range { lo, hi })
    }

    /// Per-mile pace of a whole race
    pub fn from_race(time: RaceTime, distance: CanonicalDistance) -> Self {
        let miles = distance.meters() * MILES_PER_METER;
        Pace::Point(time.as_f64() / miles)
    }

    /// Faster bound in seconds per mile
    pub fn lo(&self) -> f64 {
        match *self {
            Pace::Point(seconds) => seconds,
            Pace::Range { lo, .. } => lo,
        }
    }

    /// Slower bound in seconds per mile
    pub fn hi(&self) -> f64 {
        match *self {
            Pace::Point(seconds) => seconds,
            Pace::Range { hi, .. } => hi,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Pace::Range { .. })
    }

    /// Same pace expressed per 400m lap
    pub fn per_400m(&self) -> Self {
        self.scaled(400.0 / METERS_PER_MILE)
    }

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        match *self {
            Pace::Point(seconds) => Pace::Point(seconds * factor),
            Pace::Range { lo, hi } => Pace::Range {
                lo: lo * factor,
                hi: hi * factor,
            },
        }
    }

    /// Linear interpolation towards `other`
    ///
    /// Ranges interpolate each bound independently. When only one side is a
    /// range the point is treated as a zero-width range.
    pub fn interpolate(&self, other: &Pace, fraction: f64) -> Pace {
        let lerp = |a: f64, b: f64| a + (b - a) * fraction;
        match (self, other) {
            (Pace::Point(a), Pace::Point(b)) => Pace::Point(lerp(*a, *b)),
            _ => Pace::Range {
                lo: lerp(self.lo(), other.lo()),
                hi: lerp(self.hi(), other.hi()),
            },
        }
    }
}

fn format_pace_seconds(seconds: f64) -> String {
    format_seconds(RaceTime::from_seconds_f64(seconds).seconds())
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Pace::Point(seconds) => f.write_str(&format_pace_seconds(seconds)),
            Pace::Range { lo, hi } => {
                write!(f, "{}-{}", format_pace_seconds(lo), format_pace_seconds(hi))
            }
        }
    }
}
