//! Blast wave toward a pressure gauge.
//!
//! A slab of high-pressure gas at 1 < x < 2 drives a shock to the right.
//! The gauge at x = 9 records density times pressure after every step (set
//! `"gauge_quantity": "pressure"` for plain pressure) and the run reports
//! its maximum.
//!
//! Run with:
//! ```text
//! cargo run --release --example force_field
//! cargo run --release --example force_field -- problem.json
//! RUST_LOG=debug cargo run --release --example force_field
//! ```
//!
//! The optional JSON file overrides any field of `ForceFieldProblem`, e.g.
//! `{"n_cells": 1600, "heating": [{"lower": 4.0, "upper": 6.0, "amount": 50.0}]}`.

use std::error::Error;

use euler_fv::problems::ForceFieldProblem;
use euler_fv::solver::SolverConfig;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let problem: ForceFieldProblem = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ForceFieldProblem::new(),
    };

    println!("Force field blast wave");
    println!("======================");
    println!(
        "Domain: [{}, {}], {} cells",
        problem.x_min, problem.x_max, problem.n_cells
    );
    println!(
        "Gauge at x = {} ({:?})",
        problem.gauge_location, problem.gauge_quantity
    );
    println!("Final time: {}", problem.t_final);
    println!();

    let mut controller = problem.controller(SolverConfig::default())?;
    let summary = controller.run_with_callback(|snap| {
        let pressure = snap.pressure();
        let peak = pressure.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "frame {:2}  t = {:.3}  max density = {:.4}  max pressure = {:.4}",
            snap.frame,
            snap.time,
            snap.density().iter().copied().fold(f64::NEG_INFINITY, f64::max),
            peak
        );
    })?;

    println!();
    println!(
        "{} steps (dt in [{:.3e}, {:.3e}]), wall time {:.2}s",
        summary.n_steps, summary.dt_min, summary.dt_max, summary.wall_time
    );
    match summary.primary_gauge_max {
        Some(p) => println!("Maximum gauge reading: {p:.6}"),
        None => println!("No gauge samples recorded"),
    }

    Ok(())
}
