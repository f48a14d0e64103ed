use criterion::{criterion_group, criterion_main, Criterion};
use dpll_sat::sat::formula::Formula;
use dpll_sat::sat::heuristic::Heuristic;
use dpll_sat::sat::solver::Solver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn random_3sat(rng: &mut StdRng, num_vars: usize, num_clauses: usize) -> Formula {
    let mut clauses = Vec::with_capacity(num_clauses);
    for _ in 0..num_clauses {
        let mut clause: Vec<i32> = Vec::with_capacity(3);
        while clause.len() < 3 {
            let var = rng.random_range(1..=num_vars) as i32;
            if clause.iter().any(|l| l.abs() == var) {
                continue;
            }
            clause.push(if rng.random_bool(0.5) { var } else { -var });
        }
        clauses.push(clause);
    }
    Formula::new(clauses, num_vars)
}

fn bench_random_3sat(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    // Clause/variable ratio near the hardness peak for random 3-SAT.
    let instances: Vec<Formula> = (0..10).map(|_| random_3sat(&mut rng, 40, 170)).collect();

    let mut group = c.benchmark_group("random-3sat");
    for heuristic in [
        Heuristic::None,
        Heuristic::Dlis,
        Heuristic::Dlcs,
        Heuristic::Mom,
        Heuristic::Boehm,
        Heuristic::Jw,
    ] {
        group.bench_function(heuristic.to_string(), |b| {
            b.iter(|| {
                for formula in &instances {
                    let mut solver = Solver::new(formula.clone(), heuristic);
                    black_box(solver.solve());
                }
            });
        });
    }
    group.finish();
}

fn bench_pure_literal(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let instances: Vec<Formula> = (0..10).map(|_| random_3sat(&mut rng, 40, 170)).collect();

    let mut group = c.benchmark_group("pure-literal");
    for enabled in [false, true] {
        let label = if enabled { "on" } else { "off" };
        group.bench_function(label, |b| {
            b.iter(|| {
                for formula in &instances {
                    let mut solver = Solver::new(formula.clone(), Heuristic::Dlis);
                    solver.set_pure_literal(enabled);
                    black_box(solver.solve());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random_3sat, bench_pure_literal);
criterion_main!(benches);
