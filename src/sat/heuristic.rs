#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The branching heuristics.
//!
//! A heuristic supplies two decisions: which unassigned variable to branch on
//! (expressed as a strict `greater_than` comparison driving the priority
//! heap) and which polarity to try first. The menu is closed and selected
//! once at startup.
//!
//! Static heuristics (`slis`, `slcs`) read the fixed occurrence lists and
//! never change priority after the initial heap build. Dynamic heuristics
//! read the activity data maintained by the solver: active occurrence counts
//! (`dlis`, `dlcs`), clause-length histograms (`mom`, `boehm`), or
//! Jeroslow-Wang sums (`jw`). `backtrack-count` only shifts priorities while
//! the trail unwinds.

use crate::sat::literal::Variable;
use crate::sat::variable::VarData;
use clap::ValueEnum;
use ordered_float::OrderedFloat;
use std::fmt::{self, Display};

/// MOM weights the occurrence sum with `2^50` so counts dominate the product
/// tie-break term.
const MOM_ALPHA: i32 = 50;
/// Boehm's weight for the majority polarity count.
const BOEHM_ALPHA: u64 = 100;
/// Boehm's weight for the minority polarity count.
const BOEHM_BETA: u64 = 50;

/// The branching heuristic menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Heuristic {
    /// No heuristic: branch on the highest-numbered unassigned variable,
    /// always trying `true` first.
    #[default]
    None,
    /// Static Largest Individual Sum: `max(|pos_occ|, |neg_occ|)` over all
    /// original clauses.
    Slis,
    /// Static Largest Combined Sum: `|pos_occ| + |neg_occ|`.
    Slcs,
    /// Dynamic Largest Individual Sum: `max` of the active occurrence counts.
    Dlis,
    /// Dynamic Largest Combined Sum: sum of the active occurrence counts.
    Dlcs,
    /// Prefer variables that trail unwinds have touched most often.
    #[value(alias = "bc")]
    BacktrackCount,
    /// Maximum Occurrences in clauses of Minimum size.
    Mom,
    /// Boehm's heuristic: lexicographic comparison of weighted occurrence
    /// counts over ascending clause lengths.
    Boehm,
    /// Jeroslow-Wang: exponentially weighted occurrence sums favouring short
    /// clauses.
    Jw,
}

impl Heuristic {
    /// The strict ordering the priority heap uses: `true` iff `a` has
    /// greater priority than `b` under this heuristic.
    #[must_use]
    pub fn greater_than(self, vars: &[VarData], a: Variable, b: Variable) -> bool {
        let va = &vars[a as usize];
        let vb = &vars[b as usize];
        match self {
            Self::None => a > b,
            Self::Slis => {
                va.pos_occ.len().max(va.neg_occ.len()) > vb.pos_occ.len().max(vb.neg_occ.len())
            }
            Self::Slcs => va.pos_occ.len() + va.neg_occ.len() > vb.pos_occ.len() + vb.neg_occ.len(),
            Self::Dlis => va.pos_active.max(va.neg_active) > vb.pos_active.max(vb.neg_active),
            Self::Dlcs => va.pos_active + va.neg_active > vb.pos_active + vb.neg_active,
            Self::BacktrackCount => va.backtrack_count > vb.backtrack_count,
            Self::Mom => {
                let shortest = [shortest_len(va), shortest_len(vb)]
                    .into_iter()
                    .flatten()
                    .min();
                shortest.is_some_and(|len| mom_score(va, len) > mom_score(vb, len))
            }
            Self::Boehm => boehm_greater_than(va, vb),
            Self::Jw => {
                OrderedFloat(va.jw_pos.max(va.jw_neg)) > OrderedFloat(vb.jw_pos.max(vb.jw_neg))
            }
        }
    }

    /// The polarity to try first when branching on `var`.
    #[must_use]
    pub fn pick_polarity(self, var: &VarData) -> bool {
        match self {
            Self::None => true,
            Self::Slis | Self::Slcs => var.pos_occ.len() > var.neg_occ.len(),
            Self::Dlis | Self::Dlcs | Self::BacktrackCount | Self::Mom | Self::Boehm => {
                var.pos_active > var.neg_active
            }
            Self::Jw => var.jw_pos >= var.jw_neg,
        }
    }

    /// Whether priorities move while the solver assigns and unassigns.
    ///
    /// Static heuristics never need a resift after the initial heap build.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        !matches!(self, Self::None | Self::Slis | Self::Slcs)
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Slis => "slis",
            Self::Slcs => "slcs",
            Self::Dlis => "dlis",
            Self::Dlcs => "dlcs",
            Self::BacktrackCount => "backtrack-count",
            Self::Mom => "mom",
            Self::Boehm => "boehm",
            Self::Jw => "jw",
        };
        write!(f, "{name}")
    }
}

/// The shortest active clause length this variable occurs in, any polarity.
fn shortest_len(var: &VarData) -> Option<u32> {
    [var.pos_by_len.keys().next(), var.neg_by_len.keys().next()]
        .into_iter()
        .flatten()
        .min()
        .copied()
}

/// MOM's score at clause length `len`: `(p + n) * 2^alpha + p * n`.
fn mom_score(var: &VarData, len: u32) -> f64 {
    let p = f64::from(var.pos_by_len.get(&len).copied().unwrap_or(0));
    let n = f64::from(var.neg_by_len.get(&len).copied().unwrap_or(0));
    (p + n) * 2f64.powi(MOM_ALPHA) + p * n
}

/// Boehm's per-length score: `alpha * max(p, n) + beta * min(p, n)`.
fn boehm_score(var: &VarData, len: u32) -> u64 {
    let p = u64::from(var.pos_by_len.get(&len).copied().unwrap_or(0));
    let n = u64::from(var.neg_by_len.get(&len).copied().unwrap_or(0));
    BOEHM_ALPHA * p.max(n) + BOEHM_BETA * p.min(n)
}

/// Compares Boehm vectors lexicographically over the ascending union of
/// clause lengths either variable occurs in; ties fall through to the next
/// length.
fn boehm_greater_than(a: &VarData, b: &VarData) -> bool {
    let mut lengths: Vec<u32> = a
        .pos_by_len
        .keys()
        .chain(a.neg_by_len.keys())
        .chain(b.pos_by_len.keys())
        .chain(b.neg_by_len.keys())
        .copied()
        .collect();
    lengths.sort_unstable();
    lengths.dedup();

    for len in lengths {
        let score_a = boehm_score(a, len);
        let score_b = boehm_score(b, len);
        if score_a != score_b {
            return score_a > score_b;
        }
    }
    false
}
