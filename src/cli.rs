//! Defines the command-line interface for the solver binary.
//!
//! Uses `clap` for parsing arguments. The solver reports its result in the
//! DIMACS conventions: an `s` status line, and for satisfiable formulas a
//! `v` line listing the model as signed literals terminated by `0`.

use clap::Parser;
use dpll_sat::sat::dimacs::parse_file;
use dpll_sat::sat::heuristic::Heuristic;
use dpll_sat::sat::solver::{Solver, SolverStats};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dpll-sat", version, about = "A DPLL SAT solver for DIMACS CNF")]
pub struct Cli {
    /// Path to the DIMACS .cnf file to solve.
    pub path: PathBuf,

    /// The branching heuristic.
    #[arg(long, value_enum, default_value_t = Heuristic::None)]
    pub heuristic: Heuristic,

    /// Enable pure-literal elimination.
    #[arg(short = 'p', long)]
    pub pure_literal: bool,

    /// Trace decisions, forced assignments and backtracks to stdout.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print search statistics after the result.
    #[arg(long)]
    pub stats: bool,

    /// Check the model against the formula before reporting SAT.
    #[arg(long)]
    pub verify: bool,
}

/// Parses, solves and reports. Returns the process exit code: 0 for a
/// decision (SAT or UNSAT), 1 for a usage or input error.
pub fn run(cli: &Cli) -> i32 {
    let formula = match parse_file(&cli.path) {
        Ok(formula) => formula,
        Err(e) => {
            println!("{e}");
            println!("usage: dpll-sat [OPTIONS] <PATH>");
            return 1;
        }
    };

    let original = cli.verify.then(|| formula.clone());
    let mut solver = Solver::new(formula, cli.heuristic);
    solver.set_pure_literal(cli.pure_literal);
    solver.set_verbose(cli.verbose);

    match solver.solve() {
        Some(model) => {
            if let Some(original) = original {
                // A model that fails verification is a solver bug.
                assert!(original.verify(&model), "model failed verification");
            }
            println!("s SATISFIABLE");
            if model.is_empty() {
                println!("v 0");
            } else {
                println!("v {model} 0");
            }
        }
        None => println!("s UNSATISFIABLE"),
    }

    if cli.stats {
        print_stats(solver.stats());
    }
    0
}

fn print_stats(stats: &SolverStats) {
    println!("c =====[ search statistics ]=====");
    stat_line("decisions", stats.decisions);
    stat_line("propagations", stats.propagations);
    stat_line("backtracks", stats.backtracks);
    stat_line("pure literals", stats.pure_literals);
}

fn stat_line(label: &str, value: usize) {
    println!("c {label:<16} {value:>12}");
}
