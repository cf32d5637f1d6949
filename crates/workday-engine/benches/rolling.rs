use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use workday_engine::{CompiledCalendar, RawConfig, WorkingDuration};

fn office_calendar() -> CompiledCalendar {
    let mut raw = RawConfig::default()
        .with_day("mon", [("08:00", "12:00"), ("13:00", "18:00")])
        .with_time_zone("Europe/Paris");
    raw.set_holidays(["2024-05-01", "2024-05-08", "2024-05-09", "2024-05-20"]);
    raw.compile().unwrap()
}

fn bench_rolling(c: &mut Criterion) {
    let cal = office_calendar();
    let mut group = c.benchmark_group("rolling");

    let saturday = Utc.with_ymd_and_hms(2024, 5, 4, 10, 0, 0).unwrap();
    group.bench_function("advance_to_next_open", |b| {
        b.iter(|| cal.advance_to_next_open(black_box(&saturday)))
    });
    group.bench_function("rewind_to_open", |b| {
        b.iter(|| cal.rewind_to_open(black_box(&saturday)))
    });

    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let cal = office_calendar();
    let mut group = c.benchmark_group("arithmetic");
    let start = Utc.with_ymd_and_hms(2024, 4, 29, 11, 0, 0).unwrap();

    for hours in [1, 40, 400] {
        group.bench_with_input(BenchmarkId::new("add_hours", hours), &hours, |b, &n| {
            b.iter(|| cal.add(black_box(&start), WorkingDuration::hours(n)))
        });
    }

    for days in [1, 20, 250] {
        group.bench_with_input(BenchmarkId::new("add_days", days), &days, |b, &n| {
            b.iter(|| cal.add_business_days(black_box(&start), n))
        });
    }

    let end = Utc.with_ymd_and_hms(2024, 12, 20, 16, 30, 0).unwrap();
    group.bench_function("working_duration_between", |b| {
        b.iter(|| cal.working_duration_between(black_box(&start), black_box(&end)))
    });
    group.bench_function("working_days_between", |b| {
        b.iter(|| cal.working_days_between(black_box(&start), black_box(&end)))
    });

    group.finish();
}

criterion_group!(benches, bench_rolling, bench_arithmetic);
criterion_main!(benches);
