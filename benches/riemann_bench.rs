//! Benchmarks for the approximate Riemann solvers.
//!
//! Run with: `cargo bench --bench riemann_bench`
//!
//! Compares the HLL (entropy fix) and Rusanov fluxes on smooth and strongly
//! discontinuous interface states.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use euler_fv::equations::{Euler1D, Primitives};
use euler_fv::flux::{DEFAULT_MIN_SPREAD, FluxContext, hll_flux_euler, rusanov_flux_euler};
use euler_fv::solver::EulerState;

/// Generate interface state pairs.
fn generate_test_states(eq: &Euler1D, n: usize) -> Vec<(EulerState, EulerState)> {
    (0..n)
        .map(|i| {
            let phase = (i as f64) * 0.1;
            let left = eq.conserved(&Primitives::new(
                1.0 + 0.3 * phase.sin(),
                0.5 * phase.cos(),
                1.0 + 0.2 * phase.cos(),
            ));
            let right = eq.conserved(&Primitives::new(
                1.0 + 0.25 * (phase + 0.5).sin(),
                0.4 * (phase + 0.3).cos(),
                1.0 + 0.15 * (phase + 0.2).sin(),
            ));
            (left, right)
        })
        .collect()
}

fn bench_riemann_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("riemann_solvers");

    let eq = Euler1D::air();
    let ctx = FluxContext::new(eq, 0);
    let states = generate_test_states(&eq, 1000);

    group.bench_function("hll_efix", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for (left, right) in &states {
                let result =
                    hll_flux_euler(black_box(left), black_box(right), &ctx, DEFAULT_MIN_SPREAD);
                if let Ok(r) = result {
                    total += r.flux.rho;
                }
            }
            total
        });
    });

    group.bench_function("rusanov", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for (left, right) in &states {
                if let Ok(r) = rusanov_flux_euler(black_box(left), black_box(right), &ctx) {
                    total += r.flux.rho;
                }
            }
            total
        });
    });

    group.finish();
}

/// Pressure ratio across the interface, up to the blast-wave jump.
fn bench_pressure_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("riemann_pressure_ratio");

    let eq = Euler1D::air();
    let ctx = FluxContext::new(eq, 0);

    for ratio in [1.0, 10.0, 1001.0] {
        let left = eq.conserved(&Primitives::new(1.0, 0.0, ratio));
        let right = eq.conserved(&Primitives::new(1.0, 0.0, 1.0));

        group.bench_with_input(BenchmarkId::new("hll_efix", ratio), &ratio, |b, _| {
            b.iter(|| {
                hll_flux_euler(black_box(&left), black_box(&right), &ctx, DEFAULT_MIN_SPREAD)
            });
        });

        group.bench_with_input(BenchmarkId::new("rusanov", ratio), &ratio, |b, _| {
            b.iter(|| rusanov_flux_euler(black_box(&left), black_box(&right), &ctx));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_riemann_solvers, bench_pressure_ratio);
criterion_main!(benches);
