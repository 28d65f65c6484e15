use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use goldenpace::{
    engine::PaceEngine, parse_time, CanonicalDistance, ConsistencyValidator, FitnessIndex,
    IndexResolver, PrProfileBuilder, ProgressionProjector, RaceResult, RaceTime, ZoneTable,
};
use std::collections::BTreeMap;

/// Performance benchmarks for the calculation paths
///
/// Every operation is a lookup over small static tables; these guard against
/// accidental allocation or linear scans creeping into the hot paths.

fn bench_time_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("Time Codec");
    for text in ["24:08", "3:49:00", "1.22.30"] {
        group.bench_with_input(BenchmarkId::new("parse_time", text), &text, |b, text| {
            b.iter(|| parse_time(black_box(text)))
        });
    }
    group.finish();
}

fn bench_index_resolution(c: &mut Criterion) {
    let resolver = IndexResolver::published();
    let mut group = c.benchmark_group("Index Resolution");

    let results: Vec<RaceResult> = (0..100u32)
        .map(|i| {
            RaceResult::new(CanonicalDistance::FiveK, RaceTime::from_seconds(760 + i * 11))
                .unwrap()
        })
        .collect();

    group.throughput(Throughput::Elements(results.len() as u64));
    group.bench_function("from_result_chart_column", |b| {
        b.iter(|| {
            for result in &results {
                black_box(resolver.from_result(result));
            }
        })
    });

    let fifteen_k = RaceResult::parse("15K", "1:05:00").unwrap();
    group.bench_function("from_result_equivalence", |b| {
        b.iter(|| resolver.from_result(black_box(&fifteen_k)))
    });

    let marathon = RaceResult::parse("Marathon", "3:49:00").unwrap();
    group.bench_function("project_chart", |b| {
        b.iter(|| resolver.project(black_box(&marathon), CanonicalDistance::FiveK))
    });

    group.finish();
}

fn bench_zone_paces(c: &mut Criterion) {
    let table = ZoneTable::published();
    let mut group = c.benchmark_group("Zone Paces");

    for &index in &[30.0, 47.3, 85.0] {
        group.bench_with_input(BenchmarkId::new("paces", index), &index, |b, &index| {
            b.iter(|| table.paces(black_box(index)))
        });
    }

    group.finish();
}

fn bench_profile(c: &mut Criterion) {
    let builder = PrProfileBuilder::published();
    let validator = ConsistencyValidator::published();
    let mut group = c.benchmark_group("PR Profile");

    for &count in &[1usize, 3, 5] {
        let actuals: BTreeMap<_, _> = [
            (CanonicalDistance::Mile, "6:10"),
            (CanonicalDistance::FiveK, "21:30"),
            (CanonicalDistance::TenK, "44:40"),
            (CanonicalDistance::HalfMarathon, "1:39:00"),
            (CanonicalDistance::Marathon, "3:25:00"),
        ]
        .into_iter()
        .take(count)
        .map(|(distance, time)| (distance, time.parse::<RaceTime>().unwrap()))
        .collect();

        group.bench_with_input(BenchmarkId::new("build_and_check", count), &actuals, |b, actuals| {
            b.iter(|| {
                let profile = builder.build(actuals);
                validator.check(&profile)
            })
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let engine = PaceEngine::published();
    let start_index = FitnessIndex::clamped(45.0);
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

    c.bench_function("engine_calculate_text", |b| {
        b.iter(|| engine.calculate_text(black_box("10K"), black_box("47:12")))
    });
    c.bench_function("progression_26_weeks", |b| {
        b.iter(|| {
            ProgressionProjector::project(start_index, start, 30.0, 26, 1)
                .map(|progression| progression.iter().count())
        })
    });
}

criterion_group!(
    benches,
    bench_time_codec,
    bench_index_resolution,
    bench_zone_paces,
    bench_profile,
    bench_engine
);
criterion_main!(benches);
