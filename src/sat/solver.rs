#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
//! The DPLL search engine.
//!
//! The `Solver` owns every piece of search state: the clause array, the
//! per-variable records, the assignment trail, the unit-clause queue, and
//! the priority heap of unassigned variables. The driver alternates unit
//! propagation (plus optional pure-literal elimination) with branching
//! decisions until either the trail covers all variables (SAT) or
//! backtracking unwinds the entire trail (UNSAT).
//!
//! The correctness core is the `set`/`unset` pair. Assigning a variable
//! threads one update through all bookkeeping at once:
//!
//! 1. the trail records the assignment and the heap drops the variable;
//! 2. every clause newly satisfied by the assignment freezes (`sat_var`
//!    records the witness), and every still-unassigned variable in it leaves
//!    the active subformula: occurrence counts, length histograms and
//!    Jeroslow-Wang sums shrink, and the variable sifts down in the heap;
//! 3. every active clause containing the falsified literal shrinks by one:
//!    remaining variables move to the next histogram bucket, their JW sums
//!    grow, and they sift up; a clause reaching length 1 joins the unit
//!    queue, a clause reaching length 0 latches a conflict.
//!
//! `unset` is the exact inverse, so a chronological backtrack restores every
//! counter bit-for-bit (JW sums up to floating-point drift). Conflicts found
//! mid-pass are latched and acted on at the end, which keeps the shrinking
//! pass symmetric with its undo.

use crate::sat::clause::Clause;
use crate::sat::formula::Formula;
use crate::sat::heap::Heap;
use crate::sat::heuristic::Heuristic;
use crate::sat::literal::Variable;
use crate::sat::trail::{Mark, Trail};
use crate::sat::variable::{VarData, VarState};
use itertools::Itertools;
use std::fmt::{self, Display};

/// A satisfying assignment, one truth value per variable `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// Wraps the truth values for variables `1..=values.len()`.
    #[must_use]
    pub const fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// The truth value assigned to `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is 0 or greater than the number of variables.
    #[must_use]
    pub fn value(&self, var: Variable) -> bool {
        self.values[var as usize - 1]
    }

    /// The number of variables in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the model covers no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The model as signed DIMACS literals: `i` when variable `i` is true,
    /// `-i` when false.
    pub fn dimacs(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().enumerate().map(|(i, &b)| {
            let var = i as i32 + 1;
            if b {
                var
            } else {
                -var
            }
        })
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dimacs().join(" "))
    }
}

/// Counters describing one `solve` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    /// Branching decisions taken by the heuristic.
    pub decisions: usize,
    /// Assignments forced by unit propagation.
    pub propagations: usize,
    /// Trail unwinds (including flips that immediately conflicted).
    pub backtracks: usize,
    /// Assignments forced by pure-literal elimination.
    pub pure_literals: usize,
}

/// The DPLL solver: all search state in one aggregate.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Per-variable records, indexed by variable; slot 0 is unused.
    vars: Vec<VarData>,
    /// The clause array; occurrence lists index into it.
    clauses: Vec<Clause>,
    /// Number of variables `N`; the search is complete when the trail holds `N` entries.
    num_vars: usize,
    heuristic: Heuristic,
    trail: Trail,
    /// Stack of clauses that became unit; entries may be stale (satisfied
    /// since being pushed) and are re-checked when popped.
    unit_queue: Vec<usize>,
    heap: Heap,
    /// Pure-literal elimination, off unless requested.
    pure_literal: bool,
    /// Variables whose active occurrences became one-sided; may hold
    /// duplicates and already-assigned variables.
    pure_candidates: Vec<Variable>,
    verbose: bool,
    stats: SolverStats,
}

impl Solver {
    /// Builds the solver state for `formula`: occurrence lists, activity
    /// counters, length histograms, Jeroslow-Wang sums, the heap of all
    /// variables, and the initial unit-clause queue.
    #[must_use]
    pub fn new(formula: Formula, heuristic: Heuristic) -> Self {
        let num_vars = formula.num_vars;
        let clauses = formula.clauses;
        let mut vars = vec![VarData::default(); num_vars + 1];

        for (ci, clause) in clauses.iter().enumerate() {
            let len = clause.active;
            for &lit in &clause.lits {
                let var = &mut vars[lit.variable() as usize];
                if lit.polarity() {
                    var.pos_occ.push(ci);
                } else {
                    var.neg_occ.push(ci);
                }
                var.record_occurrence(lit.polarity(), len);
            }
        }

        let mut heap = Heap::with_capacity(num_vars);
        for var in 1..=num_vars {
            heap.insert(&mut vars, heuristic, var as Variable);
        }

        let unit_queue = clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| clause.is_unit())
            .map(|(ci, _)| ci)
            .collect();

        Self {
            vars,
            clauses,
            num_vars,
            heuristic,
            trail: Trail::with_capacity(num_vars),
            unit_queue,
            heap,
            pure_literal: false,
            pure_candidates: Vec::new(),
            verbose: false,
            stats: SolverStats::default(),
        }
    }

    /// Enables or disables pure-literal elimination.
    pub fn set_pure_literal(&mut self, enabled: bool) {
        self.pure_literal = enabled;
    }

    /// Enables or disables tracing of decisions, forced assignments and
    /// backtracks to stdout (as DIMACS `c` comment lines).
    pub fn set_verbose(&mut self, enabled: bool) {
        self.verbose = enabled;
    }

    /// Counters for the last `solve` run.
    #[must_use]
    pub const fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Runs the DPLL search.
    ///
    /// # Returns
    ///
    /// * `Some(model)` if the formula is satisfiable.
    /// * `None` if it is unsatisfiable.
    pub fn solve(&mut self) -> Option<Model> {
        // An empty clause in the input can never be satisfied.
        if self.clauses.iter().any(Clause::is_conflict) {
            return None;
        }

        if self.pure_literal {
            // Variables that are one-sided in the original formula.
            for var in 1..=self.num_vars {
                let data = &self.vars[var];
                if data.pos_occ.is_empty() != data.neg_occ.is_empty() {
                    self.pure_candidates.push(var as Variable);
                }
            }
        }

        if !self.propagate() {
            return None;
        }

        while self.trail.len() < self.num_vars {
            debug_assert!(!self.heap.is_empty(), "every unassigned variable is in the heap");
            let var = self.heap.peek()?;
            let polarity = self.heuristic.pick_polarity(&self.vars[var as usize]);
            self.stats.decisions += 1;
            if self.set(var, polarity, Mark::Branching) {
                if !self.backtrack() {
                    return None;
                }
            }
            if !self.propagate() {
                return None;
            }
        }

        Some(self.model())
    }

    /// Exhausts unit propagation and, when enabled, pure-literal
    /// elimination, backtracking over any conflicts on the way.
    ///
    /// Returns `false` when a backtrack runs off the top of the trail (the
    /// formula is unsatisfiable).
    fn propagate(&mut self) -> bool {
        loop {
            if self.unit_prop() {
                if !self.backtrack() {
                    return false;
                }
                continue;
            }
            if self.pure_literal {
                if self.pure_lit() {
                    if !self.backtrack() {
                        return false;
                    }
                    continue;
                }
                // Pure-literal assignments may have queued fresh units.
                if !self.unit_queue.is_empty() {
                    continue;
                }
            }
            return true;
        }
    }

    /// Assigns `value` to `var` and updates all bookkeeping.
    ///
    /// Returns `true` when the assignment shrank some clause to length 0;
    /// the conflict is latched, never acted on mid-pass, so the caller
    /// decides when to backtrack.
    fn set(&mut self, var: Variable, value: bool, mark: Mark) -> bool {
        let vi = var as usize;
        debug_assert!(self.vars[vi].value.is_unassigned(), "set() on an assigned variable");
        if self.verbose {
            let label = match mark {
                Mark::Branching => "decide",
                Mark::Forced => "force",
            };
            println!("c {label} {}", signed(var, value));
        }

        self.trail.push(var, mark);
        self.vars[vi].value = VarState::Assigned(value);
        self.heap.remove(&mut self.vars, self.heuristic, var);
        let dynamic = self.heuristic.is_dynamic();

        // Satisfying pass: clauses that contain the literal just made true
        // freeze, and their unassigned variables leave the active subformula.
        for i in 0..self.vars[vi].occ(value).len() {
            let ci = self.vars[vi].occ(value)[i];
            if self.clauses[ci].sat_var.is_some() {
                continue;
            }
            self.clauses[ci].sat_var = Some(var);
            let len = self.clauses[ci].active;
            for j in 0..self.clauses[ci].lits.len() {
                let lit = self.clauses[ci].lits[j];
                let ui = lit.variable() as usize;
                if self.vars[ui].value.is_assigned() {
                    continue;
                }
                self.vars[ui].erase_occurrence(lit.polarity(), len);
                if self.pure_literal
                    && self.vars[ui].active(lit.polarity()) == 0
                    && self.vars[ui].active(!lit.polarity()) > 0
                {
                    self.pure_candidates.push(lit.variable());
                }
                if dynamic {
                    // Its priority can only have dropped.
                    self.heap.sift_down(&mut self.vars, self.heuristic, lit.variable());
                }
            }
        }

        // Shrinking pass: active clauses containing the falsified literal
        // lose one active slot each.
        let mut conflict = false;
        for i in 0..self.vars[vi].occ(!value).len() {
            let ci = self.vars[vi].occ(!value)[i];
            if self.clauses[ci].sat_var.is_some() {
                continue;
            }
            self.clauses[ci].active -= 1;
            let len = self.clauses[ci].active;
            for j in 0..self.clauses[ci].lits.len() {
                let lit = self.clauses[ci].lits[j];
                let ui = lit.variable() as usize;
                if self.vars[ui].value.is_assigned() {
                    continue;
                }
                self.vars[ui].shift_occurrence(lit.polarity(), len + 1, len);
                if dynamic {
                    // Shorter clauses raise priority under the
                    // length-sensitive heuristics.
                    self.heap.sift_up(&mut self.vars, self.heuristic, lit.variable());
                }
            }
            if len == 1 {
                self.unit_queue.push(ci);
            } else if len == 0 {
                conflict = true;
            }
        }

        if conflict && self.verbose {
            println!("c conflict at depth {}", self.trail.len());
        }
        conflict
    }

    /// Reverses `set(var, ..)`: re-grows the clauses the assignment shrank,
    /// re-activates the clauses it satisfied, clears the value and returns
    /// the variable to the heap. The trail entry is popped by the caller.
    fn unset(&mut self, var: Variable) {
        let vi = var as usize;
        let value = match self.vars[vi].value {
            VarState::Assigned(b) => b,
            VarState::Unassigned => {
                debug_assert!(false, "unset() on an unassigned variable");
                return;
            }
        };
        let dynamic = self.heuristic.is_dynamic();

        // Reverse of the satisfying pass: only clauses this variable
        // witnessed come back into the active subformula.
        for i in 0..self.vars[vi].occ(value).len() {
            let ci = self.vars[vi].occ(value)[i];
            if self.clauses[ci].sat_var != Some(var) {
                continue;
            }
            self.clauses[ci].sat_var = None;
            let len = self.clauses[ci].active;
            for j in 0..self.clauses[ci].lits.len() {
                let lit = self.clauses[ci].lits[j];
                let ui = lit.variable() as usize;
                if self.vars[ui].value.is_assigned() {
                    continue;
                }
                self.vars[ui].record_occurrence(lit.polarity(), len);
                if dynamic {
                    self.heap.sift_up(&mut self.vars, self.heuristic, lit.variable());
                }
            }
        }

        // Reverse of the shrinking pass.
        for i in 0..self.vars[vi].occ(!value).len() {
            let ci = self.vars[vi].occ(!value)[i];
            if self.clauses[ci].sat_var.is_some() {
                continue;
            }
            self.clauses[ci].active += 1;
            let len = self.clauses[ci].active;
            for j in 0..self.clauses[ci].lits.len() {
                let lit = self.clauses[ci].lits[j];
                let ui = lit.variable() as usize;
                if self.vars[ui].value.is_assigned() {
                    continue;
                }
                self.vars[ui].shift_occurrence(lit.polarity(), len - 1, len);
                if dynamic {
                    self.heap.sift_down(&mut self.vars, self.heuristic, lit.variable());
                }
            }
        }

        self.vars[vi].value = VarState::Unassigned;
        self.heap.insert(&mut self.vars, self.heuristic, var);
    }

    /// Pops unit clauses and forces their sole unassigned literal.
    ///
    /// Returns `true` as soon as a forced assignment conflicts. A popped
    /// clause satisfied since it was pushed has no unassigned literal left,
    /// so the scan skips it without an explicit staleness check.
    fn unit_prop(&mut self) -> bool {
        while let Some(ci) = self.unit_queue.pop() {
            let mut forced = None;
            for j in 0..self.clauses[ci].lits.len() {
                let lit = self.clauses[ci].lits[j];
                if self.vars[lit.variable() as usize].value.is_unassigned() {
                    forced = Some(lit);
                    break;
                }
            }
            if let Some(lit) = forced {
                self.stats.propagations += 1;
                if self.set(lit.variable(), lit.polarity(), Mark::Forced) {
                    return true;
                }
            }
        }
        false
    }

    /// Forces every still-unassigned candidate towards its remaining
    /// polarity, then clears the candidate list.
    ///
    /// Candidates whose other polarity also dropped to zero constrain
    /// nothing; they are forced `true` so the trail still covers them.
    /// Returns `true` as soon as a forced assignment conflicts.
    fn pure_lit(&mut self) -> bool {
        let mut i = 0;
        // Forcing a candidate can append new candidates; the walk picks
        // them up in the same pass.
        while i < self.pure_candidates.len() {
            let var = self.pure_candidates[i];
            i += 1;
            let data = &self.vars[var as usize];
            if data.value.is_assigned() {
                continue;
            }
            let polarity = if data.pos_active > 0 {
                true
            } else if data.neg_active > 0 {
                false
            } else {
                true
            };
            self.stats.pure_literals += 1;
            if self.verbose {
                println!("c pure {}", signed(var, polarity));
            }
            if self.set(var, polarity, Mark::Forced) {
                self.pure_candidates.clear();
                return true;
            }
        }
        self.pure_candidates.clear();
        false
    }

    /// Chronological backtracking: unwinds forced assignments, then flips
    /// the most recent branching decision and re-records it as forced, so
    /// the same decision is never revisited. When the flip itself conflicts
    /// the unwind continues from there.
    ///
    /// Returns `false` when the trail empties without finding a branching
    /// entry: the formula is unsatisfiable.
    fn backtrack(&mut self) -> bool {
        loop {
            self.stats.backtracks += 1;
            self.unit_queue.clear();
            self.pure_candidates.clear();
            if self.verbose {
                println!("c backtrack at depth {}", self.trail.len());
            }
            loop {
                let Some((var, mark)) = self.trail.pop() else {
                    return false;
                };
                self.vars[var as usize].backtrack_count += 1;
                match mark {
                    Mark::Forced => self.unset(var),
                    Mark::Branching => {
                        let old = match self.vars[var as usize].value {
                            VarState::Assigned(b) => b,
                            VarState::Unassigned => unreachable!("trail entry for an unassigned variable"),
                        };
                        self.unset(var);
                        if self.set(var, !old, Mark::Forced) {
                            break;
                        }
                        return true;
                    }
                }
            }
        }
    }

    /// The current assignment as a model; only meaningful once the trail
    /// covers all variables.
    fn model(&self) -> Model {
        debug_assert_eq!(self.trail.len(), self.num_vars);
        Model::new(
            (1..=self.num_vars)
                .map(|var| self.vars[var].value == VarState::Assigned(true))
                .collect(),
        )
    }
}

fn signed(var: Variable, value: bool) -> i32 {
    if value {
        var as i32
    } else {
        -(var as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::dimacs::parse_dimacs_text;
    use crate::sat::variable::jw_weight;
    use std::collections::BTreeMap;

    const ALL_HEURISTICS: [Heuristic; 9] = [
        Heuristic::None,
        Heuristic::Slis,
        Heuristic::Slcs,
        Heuristic::Dlis,
        Heuristic::Dlcs,
        Heuristic::BacktrackCount,
        Heuristic::Mom,
        Heuristic::Boehm,
        Heuristic::Jw,
    ];

    fn solver_for(dimacs: &str, heuristic: Heuristic) -> Solver {
        let formula = parse_dimacs_text(dimacs).unwrap();
        Solver::new(formula, heuristic)
    }

    fn solve_text(dimacs: &str, heuristic: Heuristic, pure: bool) -> Option<Model> {
        let mut solver = solver_for(dimacs, heuristic);
        solver.set_pure_literal(pure);
        let model = solver.solve();
        if let Some(ref model) = model {
            let formula = parse_dimacs_text(dimacs).unwrap();
            assert!(formula.verify(model), "model fails verification");
        }
        model
    }

    impl Solver {
        /// Checks every structural invariant the bookkeeping must preserve.
        fn check_invariants(&self) {
            let tolerance = 1e-9 * self.num_vars.max(1) as f64;

            for (ci, clause) in self.clauses.iter().enumerate() {
                let unassigned = clause
                    .iter()
                    .filter(|lit| self.vars[lit.variable() as usize].value.is_unassigned())
                    .count();
                if clause.sat_var.is_none() {
                    assert_eq!(clause.active as usize, unassigned, "clause {ci}: active count");
                } else {
                    // A satisfied clause freezes its length; later
                    // assignments can only shrink the true count below it.
                    assert!(clause.active as usize >= unassigned, "clause {ci}: frozen length");
                }

                let satisfied = clause.iter().any(|lit| {
                    self.vars[lit.variable() as usize].value == VarState::Assigned(lit.polarity())
                });
                assert_eq!(
                    clause.sat_var.is_some(),
                    satisfied,
                    "clause {ci}: sat_var presence"
                );
                if let Some(witness) = clause.sat_var {
                    assert!(
                        clause.iter().any(|lit| lit.variable() == witness
                            && self.vars[witness as usize].value
                                == VarState::Assigned(lit.polarity())),
                        "clause {ci}: sat_var is not a satisfying literal"
                    );
                }
            }

            for var in 1..=self.num_vars {
                let data = &self.vars[var];
                for polarity in [true, false] {
                    let active_clauses: Vec<usize> = data
                        .occ(polarity)
                        .iter()
                        .copied()
                        .filter(|&ci| self.clauses[ci].sat_var.is_none())
                        .collect();
                    assert_eq!(
                        data.active(polarity) as usize,
                        active_clauses.len(),
                        "var {var}: active count, polarity {polarity}"
                    );

                    let mut expected_hist: BTreeMap<u32, u32> = BTreeMap::new();
                    let mut expected_jw = 0.0;
                    for &ci in &active_clauses {
                        *expected_hist.entry(self.clauses[ci].active).or_insert(0) += 1;
                        expected_jw += jw_weight(self.clauses[ci].active);
                    }
                    assert_eq!(
                        data.by_len(polarity),
                        &expected_hist,
                        "var {var}: length histogram, polarity {polarity}"
                    );
                    assert!(
                        (data.jw(polarity) - expected_jw).abs() <= tolerance,
                        "var {var}: jw sum, polarity {polarity}"
                    );
                }

                assert_eq!(
                    data.heap_pos != 0,
                    data.value.is_unassigned(),
                    "var {var}: heap membership"
                );
            }

            assert!(
                self.heap.is_well_formed(&self.vars, self.heuristic),
                "heap property violated"
            );

            let assigned = (1..=self.num_vars)
                .filter(|&var| self.vars[var].value.is_assigned())
                .count();
            assert_eq!(self.trail.len(), assigned, "trail length");
        }

        /// `solve`, but checking invariants after every driver step.
        fn solve_checked(&mut self) -> Option<Model> {
            if self.clauses.iter().any(Clause::is_conflict) {
                return None;
            }
            if self.pure_literal {
                for var in 1..=self.num_vars {
                    let data = &self.vars[var];
                    if data.pos_occ.is_empty() != data.neg_occ.is_empty() {
                        self.pure_candidates.push(var as Variable);
                    }
                }
            }
            if !self.propagate() {
                return None;
            }
            self.check_invariants();
            while self.trail.len() < self.num_vars {
                let var = self.heap.peek()?;
                let polarity = self.heuristic.pick_polarity(&self.vars[var as usize]);
                if self.set(var, polarity, Mark::Branching) {
                    if !self.backtrack() {
                        return None;
                    }
                }
                self.check_invariants();
                if !self.propagate() {
                    return None;
                }
                self.check_invariants();
            }
            Some(self.model())
        }
    }

    // End-to-end scenarios.

    #[test]
    fn test_trivial_sat() {
        let model = solve_text("p cnf 1 1\n1 0\n", Heuristic::None, false).unwrap();
        assert_eq!(model.dimacs().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_unit_cascade() {
        let model = solve_text("p cnf 3 3\n1 0\n-1 2 0\n-2 3 0\n", Heuristic::None, false).unwrap();
        assert_eq!(model.dimacs().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_contradiction() {
        assert!(solve_text("p cnf 1 2\n1 0\n-1 0\n", Heuristic::None, false).is_none());
    }

    #[test]
    fn test_classic_unsat() {
        let dimacs = "p cnf 2 4\n1 2 0\n1 -2 0\n-1 2 0\n-1 -2 0\n";
        for heuristic in ALL_HEURISTICS {
            assert!(
                solve_text(dimacs, heuristic, false).is_none(),
                "expected UNSAT under {heuristic}"
            );
        }
    }

    #[test]
    fn test_branching_and_backtrack() {
        let dimacs = "p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n";
        for heuristic in ALL_HEURISTICS {
            assert!(
                solve_text(dimacs, heuristic, false).is_some(),
                "expected SAT under {heuristic}"
            );
        }
    }

    #[test]
    fn test_tautology_tolerance() {
        let model = solve_text("p cnf 2 2\n1 -1 2 0\n-2 0\n", Heuristic::None, false).unwrap();
        assert!(!model.value(2));
    }

    #[test]
    fn test_pure_literal_forces_one_sided_variable() {
        let dimacs = "p cnf 3 2\n1 2 0\n1 3 0\n";
        let mut solver = solver_for(dimacs, Heuristic::None);
        solver.set_pure_literal(true);
        let model = solver.solve().unwrap();

        assert!(model.value(1), "pure positive variable must be forced true");
        assert!(solver.stats().pure_literals >= 1);
        assert_eq!(solver.stats().decisions, 0, "every variable here is one-sided");
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        assert!(solve_text("p cnf 2 2\n1 2 0\n0\n", Heuristic::None, false).is_none());
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let model = solve_text("p cnf 2 0\n", Heuristic::None, false).unwrap();
        assert_eq!(model.len(), 2);
    }

    /// Pigeonhole: 3 pigeons into 2 holes, UNSAT under every configuration.
    fn pigeonhole_3_2() -> String {
        let mut text = String::from("p cnf 6 9\n");
        // Variable (p, h) -> p * 2 + h - 2, for pigeons 1..=3, holes 1..=2.
        let var = |p: i32, h: i32| (p - 1) * 2 + h;
        for p in 1..=3 {
            text.push_str(&format!("{} {} 0\n", var(p, 1), var(p, 2)));
        }
        for h in 1..=2 {
            for p1 in 1..=3 {
                for p2 in (p1 + 1)..=3 {
                    text.push_str(&format!("-{} -{} 0\n", var(p1, h), var(p2, h)));
                }
            }
        }
        text
    }

    #[test]
    fn test_pigeonhole_unsat_all_configurations() {
        let dimacs = pigeonhole_3_2();
        for heuristic in ALL_HEURISTICS {
            for pure in [false, true] {
                assert!(
                    solve_text(&dimacs, heuristic, pure).is_none(),
                    "expected UNSAT under {heuristic}, pure={pure}"
                );
            }
        }
    }

    #[test]
    fn test_stats_are_counted() {
        let mut solver = solver_for("p cnf 3 3\n1 0\n-1 2 0\n-2 3 0\n", Heuristic::None);
        solver.solve().unwrap();
        assert_eq!(solver.stats().propagations, 3);
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().backtracks, 0);
    }

    // Round-trip and invariant properties.

    #[derive(Debug, PartialEq)]
    struct Snapshot {
        counters: Vec<(u32, u32, BTreeMap<u32, u32>, BTreeMap<u32, u32>)>,
        jw: Vec<(f64, f64)>,
        clause_state: Vec<(u32, Option<Variable>)>,
        trail_len: usize,
        heap_members: Vec<bool>,
    }

    fn snapshot(solver: &Solver) -> Snapshot {
        Snapshot {
            counters: solver.vars[1..]
                .iter()
                .map(|v| {
                    (
                        v.pos_active,
                        v.neg_active,
                        v.pos_by_len.clone(),
                        v.neg_by_len.clone(),
                    )
                })
                .collect(),
            jw: solver.vars[1..].iter().map(|v| (v.jw_pos, v.jw_neg)).collect(),
            clause_state: solver
                .clauses
                .iter()
                .map(|c| (c.active, c.sat_var))
                .collect(),
            trail_len: solver.trail.len(),
            heap_members: solver.vars[1..].iter().map(|v| v.heap_pos != 0).collect(),
        }
    }

    fn assert_snapshots_match(before: &Snapshot, after: &Snapshot) {
        assert_eq!(before.counters, after.counters);
        assert_eq!(before.clause_state, after.clause_state);
        assert_eq!(before.trail_len, after.trail_len);
        assert_eq!(before.heap_members, after.heap_members);
        for ((bp, bn), (ap, an)) in before.jw.iter().zip(&after.jw) {
            assert!((bp - ap).abs() < 1e-9);
            assert!((bn - an).abs() < 1e-9);
        }
    }

    #[test]
    fn test_set_unset_round_trip() {
        let dimacs = "p cnf 4 5\n1 2 3 0\n-1 -2 0\n-1 2 -3 0\n2 4 0\n-3 -4 0\n";
        for heuristic in ALL_HEURISTICS {
            let mut solver = solver_for(dimacs, heuristic);
            let before = snapshot(&solver);

            for value in [true, false] {
                let conflict = solver.set(1, value, Mark::Branching);
                assert!(!conflict);
                solver.check_invariants();
                solver.unset(1);
                solver.trail.pop();
                solver.unit_queue.clear();

                assert_snapshots_match(&before, &snapshot(&solver));
                solver.check_invariants();
            }
        }
    }

    #[test]
    fn test_nested_set_unset_round_trip() {
        let dimacs = "p cnf 4 5\n1 2 3 0\n-1 -2 0\n-1 2 -3 0\n2 4 0\n-3 -4 0\n";
        let mut solver = solver_for(dimacs, Heuristic::Jw);
        let initial = snapshot(&solver);

        assert!(!solver.set(1, true, Mark::Branching));
        let after_first = snapshot(&solver);
        assert!(!solver.set(4, false, Mark::Forced));
        solver.check_invariants();

        solver.unset(4);
        solver.trail.pop();
        solver.unit_queue.clear();
        assert_snapshots_match(&after_first, &snapshot(&solver));

        solver.unset(1);
        solver.trail.pop();
        solver.unit_queue.clear();
        assert_snapshots_match(&initial, &snapshot(&solver));
        solver.check_invariants();
    }

    #[test]
    fn test_backtrack_restores_initial_state_on_unsat() {
        // The classic 2-variable UNSAT formula: after exhausting both
        // branches the final backtrack must unwind to the empty trail.
        let mut solver = solver_for("p cnf 2 4\n1 2 0\n1 -2 0\n-1 2 0\n-1 -2 0\n", Heuristic::None);
        assert!(solver.solve().is_none());
        assert!(solver.trail.is_empty());
        assert!(solver.unit_queue.is_empty());
        solver.check_invariants();
    }

    #[test]
    fn test_invariants_hold_through_search() {
        let instances = [
            "p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n",
            "p cnf 4 6\n1 2 0\n-1 3 0\n-3 -2 0\n2 4 0\n-4 1 0\n3 4 0\n",
            "p cnf 5 8\n1 -2 0\n2 -3 0\n3 -4 0\n4 -5 0\n5 1 0\n-1 -3 0\n-2 -4 0\n1 3 5 0\n",
        ];
        for dimacs in instances {
            for heuristic in ALL_HEURISTICS {
                for pure in [false, true] {
                    let mut solver = solver_for(dimacs, heuristic);
                    solver.set_pure_literal(pure);
                    if let Some(model) = solver.solve_checked() {
                        let formula = parse_dimacs_text(dimacs).unwrap();
                        assert!(formula.verify(&model));
                    }
                }
            }
        }
    }

    #[test]
    fn test_invariants_on_random_instances() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x0D1C_E5EED);
        for _ in 0..20 {
            let num_vars = rng.random_range(4..=9);
            let num_clauses = rng.random_range(6..=24);
            let mut text = format!("p cnf {num_vars} {num_clauses}\n");
            for _ in 0..num_clauses {
                let len = rng.random_range(1..=3);
                for _ in 0..len {
                    let var = rng.random_range(1..=num_vars) as i32;
                    let lit = if rng.random_bool(0.5) { var } else { -var };
                    text.push_str(&format!("{lit} "));
                }
                text.push_str("0\n");
            }

            for heuristic in [Heuristic::None, Heuristic::Dlcs, Heuristic::Mom, Heuristic::Jw] {
                for pure in [false, true] {
                    let formula = parse_dimacs_text(&text).unwrap();
                    let mut solver = Solver::new(formula.clone(), heuristic);
                    solver.set_pure_literal(pure);
                    if let Some(model) = solver.solve_checked() {
                        assert!(formula.verify(&model), "bad model for:\n{text}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_model_display() {
        let model = Model::new(vec![true, false, true]);
        assert_eq!(model.to_string(), "1 -2 3");
        assert_eq!(model.dimacs().collect::<Vec<_>>(), vec![1, -2, 3]);
    }
}
