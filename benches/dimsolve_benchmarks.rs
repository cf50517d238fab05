//! Dimensional Analysis Benchmarks with 95% Confidence Intervals
//!
//! Statistical rigor:
//! - Sample size: 100 iterations per benchmark
//! - Confidence intervals: 95% bootstrap CI
//!
//! Run with: cargo criterion
//! JSON output: cargo criterion --message-format json

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dimsolve::config::UnitsConfig;
use dimsolve::dimension::BaseDimension::{Length, Mass, Time};
use dimsolve::prelude::*;
use dimsolve::scenarios::classic_laws;
use dimsolve::solver::LinearSystem;
use rust_decimal_macros::dec;

/// Unit algebra: composing and rendering a derived unit
fn bench_unit_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("Unit_Algebra");
    group.sample_size(100);
    group.confidence_level(0.95);

    let config = UnitsConfig::default();
    let newton = Unit::derived(&[(Mass, 1), (Length, 1), (Time, -2)]);

    group.bench_function("compose_divide", |b| {
        b.iter(|| {
            black_box(
                newton
                    .compose(&Unit::meter())
                    .and_then(|joule| joule.divide(&Unit::second())),
            )
        });
    });
    group.bench_function("display", |b| {
        b.iter(|| black_box(newton.display_with(&config)));
    });
    group.bench_function("parse_prefixed", |b| {
        let table = SiUnitTable::shared();
        b.iter(|| black_box(table.resolve_prefixed(black_box("kN"))));
    });

    group.finish();
}

/// Quantity arithmetic chains in both uncertainty modes
fn bench_quantity_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quantity_Chain");
    group.sample_size(100);
    group.confidence_level(0.95);

    let config = UnitsConfig::default();
    for mode in [UncertaintyMode::MaxDeviation, UncertaintyMode::RootSumSquare] {
        let mass = Quantity::with_uncertainty(dec!(2), Unit::kilogram(), dec!(0.02)).in_mode(mode);
        let speed = Quantity::with_uncertainty(dec!(3), Unit::derived(&[(Length, 1), (Time, -1)]), dec!(0.03))
            .in_mode(mode);

        group.bench_with_input(BenchmarkId::new("kinetic_energy", mode), &mode, |b, _| {
            b.iter(|| {
                let energy = speed
                    .pow_with(dec!(2), &config)
                    .and_then(|v2| mass.mul_with(v2, &config))
                    .and_then(|mv2| mv2.div_with(dec!(2), &config));
                black_box(energy)
            });
        });
    }

    group.finish();
}

/// Linear solve over square systems of increasing size
fn bench_linear_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Linear_Solve");
    group.sample_size(100);
    group.confidence_level(0.95);

    for n in [3_usize, 6, 9].iter() {
        group.bench_with_input(BenchmarkId::new("gauss_jordan", n), n, |b, &n| {
            let mut system = LinearSystem::new(n);
            for row in 0..n {
                let terms = (0..n).map(|col| {
                    let coefficient = if row == col { n as i64 + 1 } else { 1 };
                    (col, Exponent::from_integer(coefficient))
                });
                if system
                    .push_equation(terms, Exponent::from_integer(row as i64))
                    .is_err()
                {
                    return;
                }
            }
            b.iter(|| black_box(system.solve()));
        });
    }

    group.finish();
}

/// Formula Finder over the catalogue of classic laws
fn bench_formula_finder(c: &mut Criterion) {
    let mut group = c.benchmark_group("Formula_Finder");
    group.sample_size(100);
    group.confidence_level(0.95);

    for law in classic_laws() {
        let finder = law.finder();
        group.bench_function(BenchmarkId::new("solve", law.target_symbol), |b| {
            b.iter(|| black_box(finder.solve()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_unit_algebra,
    bench_quantity_chain,
    bench_linear_solve,
    bench_formula_finder
);
criterion_main!(benches);
