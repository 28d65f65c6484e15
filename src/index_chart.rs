//! Published fitness index chart and the resolver built on it
//!
//! Each chart row lists the race times an equally fit runner records over the
//! Mile, 5K, 10K, Half Marathon and Marathon. Rows are sorted by index, so
//! every column is sorted by descending time and can be binary searched.

use crate::equivalence::EquivalenceConverter;
use crate::error::{GoldenPaceError, Result};
use crate::models::{CanonicalDistance, FitnessIndex, RaceResult, MAX_INDEX, MIN_INDEX};
use crate::time_codec::RaceTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// A distance that has a column in the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartColumn {
    Mile,
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
}

impl ChartColumn {
    pub fn for_distance(distance: CanonicalDistance) -> Option<Self> {
        match distance {
            CanonicalDistance::Mile => Some(ChartColumn::Mile),
            CanonicalDistance::FiveK => Some(ChartColumn::FiveK),
            CanonicalDistance::TenK => Some(ChartColumn::TenK),
            CanonicalDistance::HalfMarathon => Some(ChartColumn::HalfMarathon),
            CanonicalDistance::Marathon => Some(ChartColumn::Marathon),
            _ => None,
        }
    }

    pub fn distance(self) -> CanonicalDistance {
        match self {
            ChartColumn::Mile => CanonicalDistance::Mile,
            ChartColumn::FiveK => CanonicalDistance::FiveK,
            ChartColumn::TenK => CanonicalDistance::TenK,
            ChartColumn::HalfMarathon => CanonicalDistance::HalfMarathon,
            ChartColumn::Marathon => CanonicalDistance::Marathon,
        }
    }

    const ALL: [ChartColumn; 5] = [
        ChartColumn::Mile,
        ChartColumn::FiveK,
        ChartColumn::TenK,
        ChartColumn::HalfMarathon,
        ChartColumn::Marathon,
    ];
}

/// One chart row: race times at a whole-number index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexChartRow {
    pub index: u8,
    pub mile: RaceTime,
    pub five_k: RaceTime,
    pub ten_k: RaceTime,
    pub half_marathon: RaceTime,
    pub marathon: RaceTime,
}

impl IndexChartRow {
    pub const fn new(
        index: u8,
        mile: RaceTime,
        five_k: RaceTime,
        ten_k: RaceTime,
        half_marathon: RaceTime,
        marathon: RaceTime,
    ) -> Self {
        Self {
            index,
            mile,
            five_k,
            ten_k,
            half_marathon,
            marathon,
        }
    }

    pub fn get(&self, column: ChartColumn) -> RaceTime {
        match column {
            ChartColumn::Mile => self.mile,
            ChartColumn::FiveK => self.five_k,
            ChartColumn::TenK => self.ten_k,
            ChartColumn::HalfMarathon => self.half_marathon,
            ChartColumn::Marathon => self.marathon,
        }
    }

    /// Time at `distance`, if the chart has a column for it
    pub fn time(&self, distance: CanonicalDistance) -> Option<RaceTime> {
        ChartColumn::for_distance(distance).map(|column| self.get(column))
    }

    pub fn fitness_index(&self) -> FitnessIndex {
        FitnessIndex::clamped(self.index as f64)
    }
}

const fn row(
    index: u8,
    mile: RaceTime,
    five_k: RaceTime,
    ten_k: RaceTime,
    half_marathon: RaceTime,
    marathon: RaceTime,
) -> IndexChartRow {
    IndexChartRow::new(index, mile, five_k, ten_k, half_marathon, marathon)
}

const fn t(hours: u32, minutes: u32, seconds: u32) -> RaceTime {
    RaceTime::hms(hours, minutes, seconds)
}

/// Published chart, index 30 to 85
///
/// Columns: Mile, 5K, 10K, Half Marathon, Marathon.
static PUBLISHED_ROWS: [IndexChartRow; 49] = [
    row(30, t(0, 9, 11), t(0, 30, 40), t(1, 3, 46), t(2, 21, 0), t(4, 49, 0)),
    row(32, t(0, 8, 41), t(0, 29, 5), t(1, 0, 26), t(2, 14, 0), t(4, 34, 0)),
    row(34, t(0, 8, 14), t(0, 27, 39), t(0, 57, 26), t(2, 7, 0), t(4, 22, 0)),
    row(36, t(0, 7, 49), t(0, 26, 22), t(0, 54, 44), t(2, 1, 0), t(4, 10, 0)),
    row(38, t(0, 7, 27), t(0, 25, 12), t(0, 52, 17), t(1, 56, 0), t(3, 59, 0)),
    row(40, t(0, 7, 7), t(0, 24, 8), t(0, 50, 3), t(1, 51, 0), t(3, 49, 0)),
    row(42, t(0, 6, 49), t(0, 23, 9), t(0, 48, 1), t(1, 46, 0), t(3, 40, 0)),
    row(44, t(0, 6, 32), t(0, 22, 15), t(0, 46, 9), t(1, 42, 0), t(3, 32, 0)),
    row(45, t(0, 6, 25), t(0, 21, 50), t(0, 45, 16), t(1, 40, 0), t(3, 28, 0)),
    row(46, t(0, 6, 17), t(0, 21, 25), t(0, 44, 25), t(1, 38, 0), t(3, 24, 0)),
    row(47, t(0, 6, 10), t(0, 21, 2), t(0, 43, 36), t(1, 36, 38), t(3, 21, 0)),
    row(48, t(0, 6, 3), t(0, 20, 39), t(0, 42, 50), t(1, 34, 53), t(3, 17, 0)),
    row(49, t(0, 5, 56), t(0, 20, 18), t(0, 42, 4), t(1, 33, 0), t(3, 14, 0)),
    row(50, t(0, 5, 50), t(0, 19, 57), t(0, 41, 21), t(1, 31, 0), t(3, 10, 0)),
    row(51, t(0, 5, 44), t(0, 19, 36), t(0, 40, 39), t(1, 30, 0), t(3, 7, 0)),
    row(52, t(0, 5, 38), t(0, 19, 17), t(0, 39, 59), t(1, 28, 0), t(3, 4, 0)),
    row(53, t(0, 5, 32), t(0, 18, 58), t(0, 39, 20), t(1, 27, 0), t(3, 1, 0)),
    row(54, t(0, 5, 27), t(0, 18, 40), t(0, 38, 42), t(1, 25, 0), t(2, 58, 0)),
    row(55, t(0, 5, 21), t(0, 18, 22), t(0, 38, 6), t(1, 24, 0), t(2, 56, 0)),
    row(56, t(0, 5, 16), t(0, 18, 5), t(0, 37, 31), t(1, 23, 0), t(2, 53, 0)),
    row(57, t(0, 5, 11), t(0, 17, 49), t(0, 36, 57), t(1, 22, 0), t(2, 50, 0)),
    row(58, t(0, 5, 6), t(0, 17, 33), t(0, 36, 24), t(1, 20, 0), t(2, 48, 0)),
    row(59, t(0, 5, 2), t(0, 17, 17), t(0, 35, 52), t(1, 19, 0), t(2, 45, 0)),
    row(60, t(0, 4, 57), t(0, 17, 3), t(0, 35, 22), t(1, 18, 0), t(2, 43, 0)),
    row(61, t(0, 4, 53), t(0, 16, 48), t(0, 34, 52), t(1, 17, 0), t(2, 41, 0)),
    row(62, t(0, 4, 49), t(0, 16, 34), t(0, 34, 23), t(1, 16, 0), t(2, 38, 0)),
    row(63, t(0, 4, 45), t(0, 16, 20), t(0, 33, 55), t(1, 15, 0), t(2, 36, 0)),
    row(64, t(0, 4, 41), t(0, 16, 7), t(0, 33, 28), t(1, 14, 0), t(2, 34, 0)),
    row(65, t(0, 4, 37), t(0, 15, 54), t(0, 33, 1), t(1, 13, 0), t(2, 32, 0)),
    row(66, t(0, 4, 33), t(0, 15, 42), t(0, 32, 35), t(1, 12, 0), t(2, 30, 0)),
    row(67, t(0, 4, 30), t(0, 15, 29), t(0, 32, 11), t(1, 11, 0), t(2, 28, 0)),
    row(68, t(0, 4, 26), t(0, 15, 18), t(0, 31, 46), t(1, 10, 0), t(2, 26, 0)),
    row(69, t(0, 4, 23), t(0, 15, 6), t(0, 31, 23), t(1, 9, 0), t(2, 24, 0)),
    row(70, t(0, 4, 19), t(0, 14, 55), t(0, 31, 0), t(1, 8, 0), t(2, 23, 0)),
    row(71, t(0, 4, 16), t(0, 14, 44), t(0, 30, 38), t(1, 7, 0), t(2, 21, 0)),
    row(72, t(0, 4, 13), t(0, 14, 33), t(0, 30, 16), t(1, 6, 0), t(2, 20, 0)),
    row(73, t(0, 4, 10), t(0, 14, 23), t(0, 29, 55), t(1, 5, 0), t(2, 18, 0)),
    row(74, t(0, 4, 7), t(0, 14, 13), t(0, 29, 34), t(1, 4, 30), t(2, 16, 0)),
    row(75, t(0, 4, 4), t(0, 14, 3), t(0, 29, 14), t(1, 4, 0), t(2, 14, 0)),
    row(76, t(0, 4, 2), t(0, 13, 54), t(0, 28, 55), t(1, 3, 39), t(2, 13, 0)),
    row(77, t(0, 3, 58), t(0, 13, 44), t(0, 28, 36), t(1, 2, 56), t(2, 12, 0)),
    row(78, t(0, 3, 56), t(0, 13, 35), t(0, 28, 17), t(1, 2, 34), t(2, 11, 0)),
    row(79, t(0, 3, 54), t(0, 13, 26), t(0, 27, 59), t(1, 1, 0), t(2, 9, 0)),
    row(80, t(0, 3, 51), t(0, 13, 18), t(0, 27, 41), t(1, 0, 45), t(2, 8, 0)),
    row(81, t(0, 3, 49), t(0, 13, 9), t(0, 27, 24), t(1, 0, 15), t(2, 6, 0)),
    row(82, t(0, 3, 46), t(0, 13, 1), t(0, 27, 7), t(0, 59, 38), t(2, 5, 0)),
    row(83, t(0, 3, 44), t(0, 12, 53), t(0, 26, 51), t(0, 59, 1), t(2, 3, 0)),
    row(84, t(0, 3, 42), t(0, 12, 45), t(0, 26, 34), t(0, 58, 25), t(2, 2, 0)),
    row(85, t(0, 3, 40), t(0, 12, 37), t(0, 26, 19), t(0, 57, 50), t(2, 1, 0)),
];

/// A validated view over chart rows
#[derive(Debug, Clone, Copy)]
pub struct IndexChart<'a> {
    rows: &'a [IndexChartRow],
}

impl IndexChart<'static> {
    /// The published chart shipped with the crate
    pub fn published() -> Self {
        Self {
            rows: &PUBLISHED_ROWS,
        }
    }
}

impl<'a> IndexChart<'a> {
    /// Validate and wrap a set of rows
    ///
    /// Rows must be sorted by strictly increasing index within [30, 85] and
    /// every column must strictly decrease as the index rises.
    pub fn new(rows: &'a [IndexChartRow]) -> Result<Self> {
        if rows.len() < 2 {
            return Err(GoldenPaceError::invalid_parameter(
                "rows",
                rows.len(),
                "a chart needs at least two rows",
            ));
        }

        for row in rows {
            let index = row.index as f64;
            if !(MIN_INDEX..=MAX_INDEX).contains(&index) {
                return Err(GoldenPaceError::OutOfRangeIndex { value: index });
            }
        }

        for pair in rows.windows(2) {
            let (slower, faster) = (&pair[0], &pair[1]);
            if faster.index <= slower.index {
                return Err(GoldenPaceError::invalid_parameter(
                    "rows",
                    faster.index,
                    "chart rows must be sorted by strictly increasing index",
                ));
            }
            for column in ChartColumn::ALL {
                if faster.get(column) >= slower.get(column) {
                    return Err(GoldenPaceError::invalid_parameter(
                        column.distance().label(),
                        faster.index,
                        "chart times must strictly decrease as the index rises",
                    ));
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &'a [IndexChartRow] {
        self.rows
    }

    /// Row with exactly this whole-number index
    pub fn row(&self, index: u8) -> Option<&'a IndexChartRow> {
        self.rows
            .binary_search_by_key(&index, |row| row.index)
            .ok()
            .map(|position| &self.rows[position])
    }

    /// Lowest-index row
    pub fn slowest(&self) -> &'a IndexChartRow {
        &self.rows[0]
    }

    /// Highest-index row
    pub fn fastest(&self) -> &'a IndexChartRow {
        &self.rows[self.rows.len() - 1]
    }

    /// Position of the first row at least as fast as `seconds` in `column`
    fn partition(&self, column: ChartColumn, seconds: f64) -> usize {
        self.rows
            .partition_point(|row| row.get(column).as_f64() > seconds)
    }
}

/// How a projected time was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum ProjectionMethod {
    /// Source and target distance are the same
    Identity,
    /// Looked up on the chart row nearest the source time
    Chart { index: FitnessIndex },
    /// Power-law equivalence, used when the chart has no column
    Equivalence,
}

/// A time projected from one distance to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub time: RaceTime,
    pub method: ProjectionMethod,
}

/// Resolves fitness indices from race results and race times from indices
#[derive(Debug, Clone, Copy)]
pub struct IndexResolver<'a> {
    chart: IndexChart<'a>,
}

impl IndexResolver<'static> {
    pub fn published() -> Self {
        Self::new(IndexChart::published())
    }
}

impl<'a> IndexResolver<'a> {
    pub fn new(chart: IndexChart<'a>) -> Self {
        Self { chart }
    }

    pub fn chart(&self) -> IndexChart<'a> {
        self.chart
    }

    /// Interpolated fitness index for a race result
    ///
    /// Chart distances interpolate within their own column. Any other distance
    /// is first converted to its 5K equivalent with the power-law model. Times
    /// beyond either end of the chart clamp to the boundary row.
    pub fn from_result(&self, result: &RaceResult) -> FitnessIndex {
        match ChartColumn::for_distance(result.distance) {
            Some(column) => self.interpolate(column, result.time.as_f64()),
            None => {
                let equivalent = EquivalenceConverter::convert_seconds(
                    result.time.as_f64(),
                    result.distance.meters(),
                    CanonicalDistance::FiveK.meters(),
                );
                tracing::debug!(
                    distance = %result.distance,
                    time = %result.time,
                    equivalent_5k = equivalent,
                    "resolving index from 5K equivalent"
                );
                self.interpolate(ChartColumn::FiveK, equivalent)
            }
        }
    }

    fn interpolate(&self, column: ChartColumn, seconds: f64) -> FitnessIndex {
        let slowest = self.chart.slowest();
        let fastest = self.chart.fastest();

        if seconds >= slowest.get(column).as_f64() {
            if seconds > slowest.get(column).as_f64() {
                warn_clamped(column, seconds, slowest);
            }
            return slowest.fitness_index();
        }
        if seconds <= fastest.get(column).as_f64() {
            if seconds < fastest.get(column).as_f64() {
                warn_clamped(column, seconds, fastest);
            }
            return fastest.fitness_index();
        }

        let position = self.chart.partition(column, seconds);
        let slower = &self.chart.rows[position - 1];
        let faster = &self.chart.rows[position];

        let slower_time = slower.get(column).as_f64();
        let faster_time = faster.get(column).as_f64();
        let fraction = (slower_time - seconds) / (slower_time - faster_time);
        let index = slower.index as f64 + (faster.index as f64 - slower.index as f64) * fraction;

        FitnessIndex::clamped(index)
    }

    /// Chart row whose time in the result's column is closest to the result
    ///
    /// No interpolation. Ties go to the lower index. `None` when the chart has
    /// no column for the distance.
    pub fn nearest_row(&self, result: &RaceResult) -> Option<&'a IndexChartRow> {
        let column = ChartColumn::for_distance(result.distance)?;
        let seconds = result.time.as_f64();
        let rows = self.chart.rows;
        let position = self.chart.partition(column, seconds);

        if position == 0 {
            if seconds > rows[0].get(column).as_f64() {
                warn_clamped(column, seconds, &rows[0]);
            }
            return Some(&rows[0]);
        }
        if position == rows.len() {
            let last = &rows[rows.len() - 1];
            warn_clamped(column, seconds, last);
            return Some(last);
        }

        let slower = &rows[position - 1];
        let faster = &rows[position];
        let slower_gap = (slower.get(column).as_f64() - seconds).abs();
        let faster_gap = (faster.get(column).as_f64() - seconds).abs();

        if faster_gap < slower_gap {
            Some(faster)
        } else {
            Some(slower)
        }
    }

    /// Index of the nearest chart row
    pub fn nearest_index(&self, result: &RaceResult) -> Option<FitnessIndex> {
        self.nearest_row(result).map(IndexChartRow::fitness_index)
    }

    /// Race time at a chart distance for an index
    ///
    /// Exact row times are returned unchanged; fractional indices interpolate
    /// linearly between the bracketing rows.
    pub fn time_at(&self, index: FitnessIndex, distance: CanonicalDistance) -> Option<RaceTime> {
        let column = ChartColumn::for_distance(distance)?;
        let rows = self.chart.rows;
        let wanted = index.as_f64();
        let position = rows.partition_point(|row| (row.index as f64) < wanted);

        if position == rows.len() {
            return Some(self.chart.fastest().get(column));
        }
        if position == 0 || rows[position].index as f64 == wanted {
            return Some(rows[position].get(column));
        }

        let lower = &rows[position - 1];
        let upper = &rows[position];
        let fraction = (wanted - lower.index as f64) / (upper.index as f64 - lower.index as f64);
        let lower_time = lower.get(column).as_f64();
        let upper_time = upper.get(column).as_f64();

        Some(RaceTime::from_seconds_f64(
            lower_time + (upper_time - lower_time) * fraction,
        ))
    }

    /// Equivalent times at every chart distance
    pub fn predictions(&self, index: FitnessIndex) -> BTreeMap<CanonicalDistance, RaceTime> {
        CanonicalDistance::CHART
            .iter()
            .filter_map(|&distance| self.time_at(index, distance).map(|time| (distance, time)))
            .collect()
    }

    /// Project a result onto another distance
    ///
    /// Uses the chart row nearest the result when both distances have a
    /// column, and the power-law model from the result otherwise.
    pub fn project(&self, from: &RaceResult, target: CanonicalDistance) -> Projection {
        if from.distance == target {
            return Projection {
                time: from.time,
                method: ProjectionMethod::Identity,
            };
        }

        if let Some(row) = self.nearest_row(from) {
            if let Some(time) = row.time(target) {
                return Projection {
                    time,
                    method: ProjectionMethod::Chart {
                        index: row.fitness_index(),
                    },
                };
            }
        }

        tracing::debug!(
            from = %from.distance,
            to = %target,
            "no chart column, falling back to power-law equivalence"
        );
        Projection {
            time: EquivalenceConverter::convert(from.time, from.distance, target),
            method: ProjectionMethod::Equivalence,
        }
    }
}

fn warn_clamped(column: ChartColumn, seconds: f64, boundary: &IndexChartRow) {
    tracing::warn!(
        distance = %column.distance(),
        seconds,
        clamped_to = boundary.index,
        "race time outside chart range, clamping index"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(distance: CanonicalDistance, time: &str) -> RaceResult {
        RaceResult::new(distance, time.parse().unwrap()).unwrap()
    }

    fn resolver() -> IndexResolver<'static> {
        IndexResolver::published()
    }

    #[test]
    fn test_published_chart_is_valid() {
        let chart = IndexChart::new(&PUBLISHED_ROWS).unwrap();
        assert_eq!(chart.rows().len(), 49);
        assert_eq!(chart.rows()[0].index, 30);
        assert_eq!(chart.rows()[48].index, 85);
        assert_eq!(chart.row(40).unwrap().five_k, t(0, 24, 8));
        assert!(chart.row(41).is_none());
    }

    #[test]
    fn test_exact_row_resolves_to_row_index() {
        let index = resolver().from_result(&result(CanonicalDistance::FiveK, "24:08"));
        assert_eq!(index.value(), dec!(40.0));

        let index = resolver().from_result(&result(CanonicalDistance::TenK, "50:03"));
        assert_eq!(index.value(), dec!(40.0));

        let index = resolver().from_result(&result(CanonicalDistance::Marathon, "2:30:00"));
        assert_eq!(index.value(), dec!(66.0));
    }

    #[test]
    fn test_interpolates_between_rows() {
        // 23:38 sits 30/59 of the way from the 40 row (24:08) to the 42 row (23:09)
        let index = resolver().from_result(&result(CanonicalDistance::FiveK, "23:38"));
        assert_eq!(index.value(), dec!(41.0));
    }

    #[test]
    fn test_non_chart_distance_uses_5k_equivalent() {
        let fifteen_k = result(CanonicalDistance::FifteenK, "1:15:00");
        let equivalent = EquivalenceConverter::convert(
            fifteen_k.time,
            CanonicalDistance::FifteenK,
            CanonicalDistance::FiveK,
        );
        let direct = resolver().from_result(&result(CanonicalDistance::FiveK, &equivalent.to_string()));
        let via_15k = resolver().from_result(&fifteen_k);
        assert!((direct.as_f64() - via_15k.as_f64()).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_clamps_outside_chart() {
        let fast = resolver().from_result(&result(CanonicalDistance::FiveK, "12:00"));
        assert_eq!(fast, FitnessIndex::max());

        let slow = resolver().from_result(&result(CanonicalDistance::FiveK, "45:00"));
        assert_eq!(slow, FitnessIndex::min());

        let nearest = resolver().nearest_index(&result(CanonicalDistance::Marathon, "6:00:00"));
        assert_eq!(nearest, Some(FitnessIndex::min()));

        let nearest = resolver().nearest_index(&result(CanonicalDistance::Mile, "3:30"));
        assert_eq!(nearest, Some(FitnessIndex::max()));
    }

    #[test]
    fn test_nearest_index() {
        let r = resolver();
        assert_eq!(
            r.nearest_index(&result(CanonicalDistance::Marathon, "3:49:00")).unwrap().value(),
            dec!(40.0)
        );
        // 20:00 is 3s from the 50 row (19:57) and 18s from the 49 row (20:18)
        assert_eq!(
            r.nearest_index(&result(CanonicalDistance::FiveK, "20:00")).unwrap().value(),
            dec!(50.0)
        );
        // 8:56 is exactly between 9:11 (30) and 8:41 (32): lower index wins
        assert_eq!(
            r.nearest_index(&result(CanonicalDistance::Mile, "8:56")).unwrap().value(),
            dec!(30.0)
        );
        assert!(r.nearest_index(&result(CanonicalDistance::FiftyK, "4:00:00")).is_none());
    }

    #[test]
    fn test_time_at_index() {
        let r = resolver();
        let forty = FitnessIndex::new(dec!(40)).unwrap();
        assert_eq!(r.time_at(forty, CanonicalDistance::HalfMarathon), Some(t(1, 51, 0)));

        // Halfway between 24:08 and 23:09
        let forty_one = FitnessIndex::new(dec!(41)).unwrap();
        assert_eq!(r.time_at(forty_one, CanonicalDistance::FiveK), Some(RaceTime::from_seconds(1419)));

        assert_eq!(r.time_at(forty, CanonicalDistance::FifteenK), None);
        assert_eq!(r.time_at(FitnessIndex::max(), CanonicalDistance::Mile), Some(t(0, 3, 40)));
    }

    #[test]
    fn test_predictions_cover_chart_distances() {
        let predictions = resolver().predictions(FitnessIndex::new(dec!(50)).unwrap());
        assert_eq!(predictions.len(), 5);
        assert_eq!(predictions[&CanonicalDistance::Marathon], t(3, 10, 0));
    }

    #[test]
    fn test_project_via_chart() {
        let projection = resolver().project(
            &result(CanonicalDistance::Marathon, "3:49:00"),
            CanonicalDistance::FiveK,
        );
        assert_eq!(projection.time.to_string(), "24:08");
        assert!(matches!(projection.method, ProjectionMethod::Chart { index } if index.value() == dec!(40.0)));
    }

    #[test]
    fn test_project_falls_back_to_equivalence() {
        let from = result(CanonicalDistance::Marathon, "3:49:00");
        let projection = resolver().project(&from, CanonicalDistance::FiftyK);
        assert_eq!(projection.method, ProjectionMethod::Equivalence);
        assert_eq!(
            projection.time,
            EquivalenceConverter::convert(from.time, CanonicalDistance::Marathon, CanonicalDistance::FiftyK)
        );

        let identity = resolver().project(&from, CanonicalDistance::Marathon);
        assert_eq!(identity.method, ProjectionMethod::Identity);
        assert_eq!(identity.time, from.time);
    }

    #[test]
    fn test_custom_chart_validation() {
        let good = [
            row(30, t(0, 9, 0), t(0, 30, 0), t(1, 2, 0), t(2, 20, 0), t(4, 50, 0)),
            row(40, t(0, 7, 0), t(0, 24, 0), t(0, 50, 0), t(1, 50, 0), t(3, 50, 0)),
        ];
        assert!(IndexChart::new(&good).is_ok());

        assert!(IndexChart::new(&good[..1]).is_err());

        let unsorted = [good[1], good[0]];
        assert!(IndexChart::new(&unsorted).is_err());

        let flat_column = [
            good[0],
            row(40, t(0, 9, 0), t(0, 24, 0), t(0, 50, 0), t(1, 50, 0), t(3, 50, 0)),
        ];
        assert!(IndexChart::new(&flat_column).is_err());

        let out_of_range = [
            good[0],
            row(90, t(0, 3, 0), t(0, 12, 0), t(0, 25, 0), t(0, 55, 0), t(1, 55, 0)),
        ];
        assert!(matches!(
            IndexChart::new(&out_of_range),
            Err(GoldenPaceError::OutOfRangeIndex { .. })
        ));
    }

    #[test]
    fn test_custom_chart_resolution() {
        let rows = [
            row(30, t(0, 9, 0), t(0, 30, 0), t(1, 2, 0), t(2, 20, 0), t(4, 50, 0)),
            row(40, t(0, 7, 0), t(0, 24, 0), t(0, 50, 0), t(1, 50, 0), t(3, 50, 0)),
        ];
        let resolver = IndexResolver::new(IndexChart::new(&rows).unwrap());
        let index = resolver.from_result(&result(CanonicalDistance::FiveK, "27:00"));
        assert_eq!(index.value(), dec!(35.0));
    }
}
