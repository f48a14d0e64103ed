#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A max-heap over unassigned variables.
//!
//! The heap stores variable indices in a 1-based array (slot 0 is a
//! sentinel), and each variable records its own slot in `VarData::heap_pos`
//! (0 when absent), so membership tests and repositioning are O(1) lookups.
//! The heap does not own priorities: the comparator reads whatever fields the
//! active heuristic uses directly from the variables. Any code that mutates a
//! priority-affecting field must immediately sift the variable up or down
//! while it remains in the heap.

use crate::sat::heuristic::Heuristic;
use crate::sat::literal::Variable;
use crate::sat::variable::VarData;

/// A max-heap of variable indices ordered by the selected heuristic.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    /// 1-based storage; `data[0]` is a sentinel that is never compared.
    data: Vec<Variable>,
}

impl Heap {
    /// Creates an empty heap with room for `n` variables.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        let mut data = Vec::with_capacity(n + 1);
        data.push(0);
        Self { data }
    }

    /// Number of variables currently in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    /// Returns `true` if no variable is in the heap.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variable with the greatest priority, if any.
    #[must_use]
    pub fn peek(&self) -> Option<Variable> {
        self.data.get(1).copied()
    }

    /// Appends `var`, records its position, and sifts it up.
    pub fn insert(&mut self, vars: &mut [VarData], heuristic: Heuristic, var: Variable) {
        debug_assert_eq!(vars[var as usize].heap_pos, 0, "variable already in heap");
        self.data.push(var);
        vars[var as usize].heap_pos = self.data.len() - 1;
        self.sift_up(vars, heuristic, var);
    }

    /// Removes `var` by swapping it with the tail, then re-sifts the
    /// displaced element into place.
    pub fn remove(&mut self, vars: &mut [VarData], heuristic: Heuristic, var: Variable) {
        let pos = vars[var as usize].heap_pos;
        debug_assert_ne!(pos, 0, "variable not in heap");
        let last = self.data.len() - 1;
        self.data.swap(pos, last);
        self.data.pop();
        vars[var as usize].heap_pos = 0;

        if pos < self.data.len() {
            let displaced = self.data[pos];
            vars[displaced as usize].heap_pos = pos;
            // The tail element can land either side of its new neighbours;
            // at most one of these moves it.
            self.sift_down(vars, heuristic, displaced);
            self.sift_up(vars, heuristic, displaced);
        }
    }

    /// Repositions `var` upwards after its priority increased.
    pub fn sift_up(&mut self, vars: &mut [VarData], heuristic: Heuristic, var: Variable) {
        let mut pos = vars[var as usize].heap_pos;
        debug_assert_ne!(pos, 0, "variable not in heap");
        while pos > 1 {
            let parent = self.data[pos / 2];
            if !heuristic.greater_than(vars, var, parent) {
                break;
            }
            self.data[pos] = parent;
            vars[parent as usize].heap_pos = pos;
            pos /= 2;
        }
        self.data[pos] = var;
        vars[var as usize].heap_pos = pos;
    }

    /// Repositions `var` downwards after its priority decreased.
    pub fn sift_down(&mut self, vars: &mut [VarData], heuristic: Heuristic, var: Variable) {
        let mut pos = vars[var as usize].heap_pos;
        debug_assert_ne!(pos, 0, "variable not in heap");
        loop {
            let left = pos * 2;
            if left >= self.data.len() {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < self.data.len()
                && heuristic.greater_than(vars, self.data[right], self.data[left])
            {
                child = right;
            }
            if !heuristic.greater_than(vars, self.data[child], var) {
                break;
            }
            let promoted = self.data[child];
            self.data[pos] = promoted;
            vars[promoted as usize].heap_pos = pos;
            pos = child;
        }
        self.data[pos] = var;
        vars[var as usize].heap_pos = pos;
    }

    /// Checks the max-heap property and position bookkeeping; used by tests
    /// and debug assertions.
    #[must_use]
    pub fn is_well_formed(&self, vars: &[VarData], heuristic: Heuristic) -> bool {
        for pos in 1..self.data.len() {
            let var = self.data[pos];
            if vars[var as usize].heap_pos != pos {
                return false;
            }
            if pos > 1 && heuristic.greater_than(vars, var, self.data[pos / 2]) {
                return false;
            }
        }
        true
    }
}
