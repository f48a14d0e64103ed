#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Per-variable solver state.
//!
//! Each variable carries its assignment, its occurrence lists (which clauses
//! it appears in, by polarity), and the incrementally maintained activity
//! data the branching heuristics read: occurrence counts restricted to the
//! active (unsatisfied) subformula, histograms of active clause lengths, and
//! Jeroslow-Wang sums. The `heap_pos` field ties the variable to its slot in
//! the priority heap.

use std::collections::BTreeMap;

/// Represents the assignment state of a propositional variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// The variable has not been assigned a truth value.
    #[default]
    Unassigned,
    /// The variable has been assigned a specific truth value.
    Assigned(bool),
}

impl VarState {
    /// Checks if the variable state is `Assigned`.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// Checks if the variable state is `Unassigned`.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

impl From<VarState> for Option<bool> {
    fn from(s: VarState) -> Self {
        match s {
            VarState::Assigned(b) => Some(b),
            VarState::Unassigned => None,
        }
    }
}

/// The solver-side record for one variable.
///
/// The occurrence lists (`pos_occ`/`neg_occ`) are built once from the parsed
/// formula and never change; their lengths are the static occurrence counts
/// used by the static heuristics. Everything else is updated by the
/// assignment/unassignment protocol and must stay consistent with the clause
/// states at all times.
#[derive(Debug, Clone, Default)]
pub struct VarData {
    /// Current assignment.
    pub value: VarState,
    /// Indices of clauses containing this variable positively. Fixed after parsing.
    pub pos_occ: Vec<usize>,
    /// Indices of clauses containing this variable negatively. Fixed after parsing.
    pub neg_occ: Vec<usize>,
    /// Number of *active* (unsatisfied) clauses containing the positive literal.
    pub pos_active: u32,
    /// Number of *active* clauses containing the negative literal.
    pub neg_active: u32,
    /// Histogram: active clause length -> number of active clauses of that
    /// length containing the positive literal. Keys ascend, so the smallest
    /// current length is the first entry.
    pub pos_by_len: BTreeMap<u32, u32>,
    /// Histogram for the negative literal.
    pub neg_by_len: BTreeMap<u32, u32>,
    /// Jeroslow-Wang sum for the positive literal: sum of `2^(-len(C))` over
    /// active clauses `C` containing it.
    pub jw_pos: f64,
    /// Jeroslow-Wang sum for the negative literal.
    pub jw_neg: f64,
    /// How many trail unwinds have touched this variable.
    pub backtrack_count: u64,
    /// Index of this variable in the heap array; 0 when not in the heap.
    pub heap_pos: usize,
}

impl VarData {
    /// The clause indices where this variable occurs with the given polarity.
    #[must_use]
    pub fn occ(&self, polarity: bool) -> &[usize] {
        if polarity {
            &self.pos_occ
        } else {
            &self.neg_occ
        }
    }

    /// The active occurrence count for the given polarity.
    #[must_use]
    pub const fn active(&self, polarity: bool) -> u32 {
        if polarity {
            self.pos_active
        } else {
            self.neg_active
        }
    }

    /// Mutable access to the active occurrence count for the given polarity.
    pub fn active_mut(&mut self, polarity: bool) -> &mut u32 {
        if polarity {
            &mut self.pos_active
        } else {
            &mut self.neg_active
        }
    }

    /// The clause-length histogram for the given polarity.
    #[must_use]
    pub const fn by_len(&self, polarity: bool) -> &BTreeMap<u32, u32> {
        if polarity {
            &self.pos_by_len
        } else {
            &self.neg_by_len
        }
    }

    /// Mutable access to the clause-length histogram for the given polarity.
    pub fn by_len_mut(&mut self, polarity: bool) -> &mut BTreeMap<u32, u32> {
        if polarity {
            &mut self.pos_by_len
        } else {
            &mut self.neg_by_len
        }
    }

    /// The Jeroslow-Wang sum for the given polarity.
    #[must_use]
    pub const fn jw(&self, polarity: bool) -> f64 {
        if polarity {
            self.jw_pos
        } else {
            self.jw_neg
        }
    }

    /// Mutable access to the Jeroslow-Wang sum for the given polarity.
    pub fn jw_mut(&mut self, polarity: bool) -> &mut f64 {
        if polarity {
            &mut self.jw_pos
        } else {
            &mut self.jw_neg
        }
    }

    /// Records one active clause of length `len` for the given polarity.
    pub fn record_occurrence(&mut self, polarity: bool, len: u32) {
        *self.active_mut(polarity) += 1;
        *self.by_len_mut(polarity).entry(len).or_insert(0) += 1;
        *self.jw_mut(polarity) += jw_weight(len);
    }

    /// Removes one active clause of length `len` for the given polarity.
    pub fn erase_occurrence(&mut self, polarity: bool, len: u32) {
        *self.active_mut(polarity) -= 1;
        self.histogram_decrement(polarity, len);
        *self.jw_mut(polarity) -= jw_weight(len);
    }

    /// Moves one histogram entry from length `from` to length `to` and
    /// adjusts the Jeroslow-Wang sum accordingly.
    pub fn shift_occurrence(&mut self, polarity: bool, from: u32, to: u32) {
        self.histogram_decrement(polarity, from);
        *self.by_len_mut(polarity).entry(to).or_insert(0) += 1;
        *self.jw_mut(polarity) += jw_weight(to) - jw_weight(from);
    }

    fn histogram_decrement(&mut self, polarity: bool, len: u32) {
        let histogram = self.by_len_mut(polarity);
        let count = histogram
            .get_mut(&len)
            .unwrap_or_else(|| panic!("histogram has no entry for length {len}"));
        *count -= 1;
        if *count == 0 {
            histogram.remove(&len);
        }
    }
}

/// The Jeroslow-Wang weight of a clause of active length `len`: `2^(-len)`.
#[must_use]
pub fn jw_weight(len: u32) -> f64 {
    #[allow(clippy::cast_possible_wrap)]
    let exponent = -(len as i32);
    2f64.powi(exponent)
}
