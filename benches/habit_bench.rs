//! Criterion benchmarks for the habit core.
//!
//! Run with:
//!   cargo bench
//!
//! Covers:
//!   - streak computation over a decade of consecutive dates
//!   - interpolated history over a year
//!   - boundary date parsing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use habitd::habit::{parse_date, HabitModel};
use habitd::store::DateStore;

fn bench_habit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let (model, last) = rt.block_on(async {
        let model = HabitModel::load(DateStore::new(dir.path().join("meditation.csv")))
            .await
            .unwrap();

        // Ten years of consecutive days — the worst case for the streak walk.
        let mut dates = Vec::with_capacity(3650);
        let mut day = parse_date("2014-01-01").unwrap();
        for _ in 0..3650 {
            dates.push(day.to_string());
            day = day.succ_opt().unwrap();
        }
        let last = dates.last().unwrap().clone();
        model.add_dates(&dates).await.unwrap();
        (model, last)
    });

    c.bench_function("streak_10_years", |b| {
        b.iter(|| {
            let n = rt.block_on(model.streak(black_box(&last))).unwrap();
            black_box(n);
        });
    });

    c.bench_function("history_365_days", |b| {
        b.iter(|| {
            let h = rt.block_on(model.history(black_box(&last), 365)).unwrap();
            black_box(h);
        });
    });

    c.bench_function("parse_date", |b| {
        b.iter(|| {
            let d = parse_date(black_box("2024-02-29")).unwrap();
            black_box(d);
        });
    });
}

criterion_group!(benches, bench_habit);
criterion_main!(benches);
