#![warn(missing_docs)]
//! This crate implements a DPLL (Davis-Putnam-Logemann-Loveland) solver for
//! the Boolean satisfiability problem, operating on formulas in Conjunctive
//! Normal Form (CNF) read from the DIMACS file format.
//!
//! The search combines unit propagation, optional pure-literal elimination,
//! chronological backtracking, and a branching heuristic chosen from a closed
//! menu at startup. Unassigned variables are kept in a priority heap whose
//! ordering follows the selected heuristic.

/// The `sat` module implements the solver: formula representation, DIMACS
/// parsing, the priority heap, the branching heuristics, and the DPLL search.
pub mod sat;
