//! # Odometry Benchmark
//!
//! The odometry and heading updates run inside every tick of every blocking loop, so they have
//! to be cheap. This bench keeps an eye on the cost of one full sampling step.

use criterion::{criterion_group, criterion_main, Criterion};

use bot_lib::loc::{HeadingEstimator, LocParams, OdomEstimator};

fn odom_benchmark(c: &mut Criterion) {
    let params = LocParams::default();

    c.bench_function("OdomEstimator::update", |b| {
        let mut odom = OdomEstimator::new(&params);
        let mut count = 0i32;

        b.iter(|| {
            count += 7;
            odom.update(count, count);
            odom.distance_mm()
        })
    });

    c.bench_function("odom_and_heading_update", |b| {
        let mut odom = OdomEstimator::new(&params);
        let mut heading = HeadingEstimator::new(&params);
        let mut count = 0i32;

        b.iter(|| {
            count += 7;
            odom.update(count + 3, count);
            heading.update(odom.left_delta_mm(), odom.right_delta_mm());
            heading.heading_deg()
        })
    });
}

criterion_group!(benches, odom_benchmark);
criterion_main!(benches);
