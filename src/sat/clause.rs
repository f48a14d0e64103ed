#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Contains details of a clause, a fundamental component in SAT solvers.
//!
//! A clause is a disjunction of literals (e.g. `x1 OR !x2 OR x3`). Beyond its
//! literal list, a clause carries the two pieces of search state the solver
//! maintains incrementally: `active`, the number of literals whose variable is
//! currently unassigned, and `sat_var`, the variable whose assignment first
//! satisfied the clause (if any). A clause with `sat_var` set is *satisfied*;
//! an unsatisfied clause of active length 1 is *unit*; an unsatisfied clause
//! of active length 0 is a *conflict*.

use crate::sat::literal::{Literal, Variable};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Represents a clause in a SAT formula.
///
/// The literal list is fixed once the clause is built; duplicate literals are
/// collapsed during construction. `active` and `sat_var` evolve as the solver
/// assigns and unassigns variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause {
    /// The collection of literals forming the clause. Fixed after parsing.
    pub lits: SmallVec<[Literal; 8]>,
    /// Number of literals whose variable is currently unassigned.
    pub active: u32,
    /// The variable whose assignment first satisfied this clause, or `None`
    /// while the clause is unsatisfied.
    pub sat_var: Option<Variable>,
}

impl Clause {
    /// Creates a clause from a slice of literals, collapsing duplicates.
    ///
    /// `active` starts at the deduplicated length; `sat_var` starts unset.
    #[must_use]
    pub fn new(literals: &[Literal]) -> Self {
        literals.iter().copied().collect()
    }

    /// Checks if the clause contains both a literal and its negation.
    ///
    /// Such a clause is always true and never meaningfully participates in
    /// propagation; the formula builder drops it.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.len(), rustc_hash::FxBuildHasher);
        for &lit in &self.lits {
            if seen.contains(&lit.negated()) {
                return true;
            }
            seen.insert(lit);
        }
        false
    }

    /// Returns the number of literals in the clause.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Returns `true` if the clause has no literals.
    ///
    /// An empty clause is a contradiction: no assignment can satisfy it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// A clause is satisfied as soon as one of its literals is assigned true.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.sat_var.is_some()
    }

    /// An unsatisfied clause whose active length has shrunk to 1; its sole
    /// unassigned literal must be assigned to satisfy the clause.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        self.sat_var.is_none() && self.active == 1
    }

    /// An unsatisfied clause with no unassigned literals left.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        self.sat_var.is_none() && self.active == 0
    }

    /// Returns an iterator over the literals in the clause.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.lits.iter()
    }
}

impl FromIterator<Literal> for Clause {
    /// Collects literals into a clause, keeping the first occurrence of each.
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut seen = FxHashSet::default();
        let lits: SmallVec<[Literal; 8]> =
            iter.into_iter().filter(|&lit| seen.insert(lit)).collect();

        #[allow(clippy::cast_possible_truncation)]
        let active = lits.len() as u32;
        Self {
            lits,
            active,
            sat_var: None,
        }
    }
}

impl FromIterator<i32> for Clause {
    /// Creates a clause from DIMACS-signed integers (positive for the
    /// variable, negative for its negation), collapsing duplicates.
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        iter.into_iter().map(Literal::from_i32).collect()
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().collect()
    }
}
