#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The formula store: the owning array of clauses making up a CNF formula.
//!
//! A CNF formula is a conjunction (AND) of clauses, where each clause is a
//! disjunction (OR) of literals. Clauses are addressed by index for the
//! solver's lifetime; variables are the integers `1..=num_vars`.
//!
//! Construction normalises the input: duplicate literals within a clause are
//! collapsed and tautological clauses (containing both `x` and `!x`) are
//! dropped. Empty clauses are kept — they make the formula trivially
//! unsatisfiable and the solver reports that before searching.

use crate::sat::clause::Clause;
use crate::sat::solver::Model;
use itertools::Itertools;
use std::fmt::{self, Display};

/// Represents a boolean formula in Conjunctive Normal Form (CNF).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    /// The list of clauses that make up the formula.
    pub clauses: Vec<Clause>,
    /// The number of variables; variables are indexed `1..=num_vars`.
    pub num_vars: usize,
}

impl Formula {
    /// Creates a formula from clauses of DIMACS-signed integers.
    ///
    /// Duplicates within a clause are collapsed and tautologies dropped.
    /// `declared_vars` is the variable count from the problem line; the
    /// stored count is raised to the largest variable actually seen, so a
    /// formula stays well-formed even when the header undercounts.
    pub fn new<J, I>(clauses: I, declared_vars: usize) -> Self
    where
        J: IntoIterator<Item = i32>,
        I: IntoIterator<Item = J>,
    {
        let clauses: Vec<Clause> = clauses
            .into_iter()
            .map(|lits| lits.into_iter().collect::<Clause>())
            .filter(|clause| !clause.is_tautology())
            .collect();

        let max_seen = clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|lit| lit.variable() as usize)
            .max()
            .unwrap_or(0);

        Self {
            clauses,
            num_vars: declared_vars.max(max_seen),
        }
    }

    /// Returns the number of clauses in the formula.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if the formula contains no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns an iterator over the clauses in the formula.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Verifies that `model` satisfies every clause of the formula.
    #[must_use]
    pub fn verify(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|lit| model.value(lit.variable()) == lit.polarity())
        })
    }
}

impl Display for Formula {
    /// Formats the formula in DIMACS CNF form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{} 0", clause.iter().map(|lit| lit.to_i32()).join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_drops_tautologies() {
        let formula = Formula::new(vec![vec![1, -1, 2], vec![-2]], 2);
        assert_eq!(formula.len(), 1);
        assert_eq!(formula.num_vars, 2);
        assert_eq!(formula.clauses[0].lits.len(), 1);
    }

    #[test]
    fn test_new_raises_num_vars_to_largest_seen() {
        let formula = Formula::new(vec![vec![1, 7]], 2);
        assert_eq!(formula.num_vars, 7);
    }

    #[test]
    fn test_keeps_empty_clause() {
        let formula = Formula::new(vec![Vec::<i32>::new(), vec![1]], 1);
        assert_eq!(formula.len(), 2);
        assert!(formula.clauses[0].is_conflict());
    }

    #[test]
    fn test_verify() {
        let formula = Formula::new(vec![vec![1, 2], vec![-1, 3], vec![-2, -3]], 3);

        let good = Model::new(vec![true, false, true]);
        assert!(formula.verify(&good));

        let bad = Model::new(vec![true, true, true]);
        assert!(!formula.verify(&bad));
    }

    #[test]
    fn test_display_dimacs() {
        let formula = Formula::new(vec![vec![1, -2], vec![2]], 2);
        let text = formula.to_string();
        assert_eq!(text, "p cnf 2 2\n1 -2 0\n2 0\n");
    }
}
